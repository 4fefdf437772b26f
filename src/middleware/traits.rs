use async_trait::async_trait;
use bytes::Bytes;
use hyper::{HeaderMap, Request, StatusCode};

/// HTTP 응답 라이터 트레이트
///
/// 호스팅 서버가 노출하는 응답 기록 능력(헤더 접근, 바디 쓰기,
/// 상태 코드 확정)을 정의합니다.
pub trait ResponseWriter: Send {
    /// 응답 헤더 맵에 대한 가변 접근을 반환합니다.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// 응답 바디 청크를 씁니다.
    fn write_body(&mut self, chunk: Bytes);

    /// 상태 코드를 확정하고 상태 라인을 내보냅니다.
    fn write_status(&mut self, status: StatusCode);
}

/// 다운스트림 핸들러 트레이트
///
/// 요청당 정확히 한 번 호출되며, 응답은 전달받은 라이터에 기록합니다.
#[async_trait]
pub trait Handler<B: Send + 'static>: Send + Sync {
    async fn handle(&self, req: Request<B>, writer: &mut dyn ResponseWriter);
}

/// 함수나 클로저를 핸들러로 사용하기 위한 어댑터
pub struct HandlerFn<F>(pub F);

#[async_trait]
impl<B, F> Handler<B> for HandlerFn<F>
where
    B: Send + 'static,
    F: Fn(Request<B>, &mut dyn ResponseWriter) + Send + Sync,
{
    async fn handle(&self, req: Request<B>, writer: &mut dyn ResponseWriter) {
        (self.0)(req, writer);
    }
}
