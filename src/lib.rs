//! Redirect Location은 리버스 프록시 뒤의 백엔드가 만든
//! 리다이렉트 응답의 Location 헤더를 교정하는 미들웨어입니다.
//!
//! 프록시가 경로 프리픽스를 제거한 채 요청을 전달하면 백엔드가 생성한
//! 리다이렉트 URL은 클라이언트가 보는 주소와 어긋납니다. 이 미들웨어는
//! 리다이렉트 범위(300 초과 400 미만)의 상태 코드가 확정되는 순간
//! Location 값을 읽어 프리픽스를 복원하고, 설정된 재작성 규칙을
//! 순서대로 적용합니다.
//!
//! # 주요 기능
//!
//! - 기본 프리픽스 보정 (X-Forwarded-Host / X-Forwarded-Prefix 기반)
//! - 순서가 보장되는 정규식 재작성 체인
//! - Docker 라벨 / TOML / JSON 설정 파싱
//!
//! # 예제
//!
//! ```
//! use redirect_location::middleware::redirect_location::{
//!     RedirectLocationConfig, RedirectLocationMiddleware, RewriteConfig,
//! };
//! use redirect_location::middleware::{HandlerFn, ResponseWriter};
//! use hyper::header::LOCATION;
//!
//! fn backend(_req: hyper::Request<()>, writer: &mut dyn ResponseWriter) {
//!     writer.headers_mut().insert(LOCATION, "/login".parse().unwrap());
//!     writer.write_status(hyper::StatusCode::FOUND);
//! }
//!
//! let config = RedirectLocationConfig {
//!     default_handling: true,
//!     rewrites: vec![RewriteConfig {
//!         regex: "^http://(.+)$".to_string(),
//!         replacement: "https://$1".to_string(),
//!     }],
//! };
//!
//! let middleware =
//!     RedirectLocationMiddleware::new(&config, HandlerFn(backend), "redirect-location").unwrap();
//! assert_eq!(middleware.name(), "redirect-location");
//! ```

pub mod logging;
pub mod middleware;
