#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    /// 설정 오류 (정규식 컴파일 실패, 잘못된 라벨 등)
    #[error("설정 오류: {0}")]
    Config(String),

    /// 파싱할 수 없는 리다이렉트 대상
    #[error("잘못된 리다이렉트 대상 {location:?}: {message}")]
    MalformedLocation {
        location: String,
        message: String,
    },
}
