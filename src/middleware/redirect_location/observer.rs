use tracing::debug;

/// Location 재작성 이벤트 옵저버 트레이트
///
/// 값이 실제로 바뀐 경우에만 호출됩니다. 미들웨어 생성 시 주입하며,
/// 지정하지 않으면 tracing 기반 기본 구현이 사용됩니다.
pub trait RewriteObserver: Send + Sync {
    /// 기본 프리픽스 보정이 경로를 변경했을 때 호출됩니다.
    fn on_prefix_applied(&self, old_path: &str, new_path: &str);

    /// 재작성 규칙이 값을 변경했을 때 호출됩니다.
    fn on_rewrite_applied(&self, pattern: &str, before: &str, after: &str);
}

/// tracing으로 재작성 이벤트를 남기는 기본 옵저버
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RewriteObserver for TracingObserver {
    fn on_prefix_applied(&self, old_path: &str, new_path: &str) {
        debug!(
            old_path = %old_path,
            new_path = %new_path,
            "Changed location path"
        );
    }

    fn on_rewrite_applied(&self, pattern: &str, before: &str, after: &str) {
        debug!(
            pattern = %pattern,
            before = %before,
            after = %after,
            "Changed location"
        );
    }
}
