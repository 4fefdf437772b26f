use tracing::Level;
use tracing_subscriber::EnvFilter;

/// tracing 구독자를 초기화합니다.
///
/// 호스팅 프록시가 부팅 시 한 번 호출합니다. RUST_LOG 환경 변수로
/// 필터를 재정의할 수 있습니다.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive(Level::INFO.into())
            .add_directive("redirect_location=debug".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
