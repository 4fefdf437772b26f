//! 리다이렉트 Location 교정 미들웨어
//!
//! 리다이렉트 응답(300 초과 400 미만)의 Location 헤더를 가로채
//! 프록시가 제거한 경로 프리픽스를 복원하고, 설정된 정규식 재작성
//! 규칙을 순서대로 적용합니다.

mod config;
mod location;
mod middleware;
mod observer;
mod rewrite;

pub use config::{RedirectLocationConfig, RewriteConfig};
pub use location::{
    reconcile_prefix, ForwardedContext, FORWARDED_HOST_HEADER, FORWARDED_PREFIX_HEADER,
};
pub use middleware::{LocationInterceptor, RedirectLocationMiddleware};
pub use observer::{RewriteObserver, TracingObserver};
pub use rewrite::{apply_rewrites, compile_rewrites, Rewrite};
