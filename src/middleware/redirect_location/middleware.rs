use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{HeaderMap, Request, StatusCode};
use tracing::warn;

use super::config::RedirectLocationConfig;
use super::location::{reconcile_prefix, ForwardedContext};
use super::observer::{RewriteObserver, TracingObserver};
use super::rewrite::{apply_rewrites, compile_rewrites, Rewrite};
use crate::middleware::{write_error_response, Handler, MiddlewareError, ResponseWriter};

/// 리다이렉트 Location 교정 미들웨어
///
/// 다운스트림 핸들러 하나를 감싸며, 요청마다 실제 라이터를
/// `LocationInterceptor`로 감싸서 전달합니다.
pub struct RedirectLocationMiddleware<H> {
    default_handling: bool,
    rewrites: Vec<Rewrite>,
    next: H,
    name: String,
    observer: Arc<dyn RewriteObserver>,
}

impl<H> RedirectLocationMiddleware<H> {
    /// 설정으로부터 미들웨어 인스턴스를 생성합니다.
    ///
    /// 모든 정규식은 이 시점에 컴파일되며, 하나라도 잘못되면
    /// 인스턴스는 생성되지 않습니다.
    pub fn new(
        config: &RedirectLocationConfig,
        next: H,
        name: impl Into<String>,
    ) -> Result<Self, MiddlewareError> {
        Self::with_observer(config, next, name, Arc::new(TracingObserver))
    }

    /// 옵저버를 직접 주입하여 생성합니다.
    pub fn with_observer(
        config: &RedirectLocationConfig,
        next: H,
        name: impl Into<String>,
        observer: Arc<dyn RewriteObserver>,
    ) -> Result<Self, MiddlewareError> {
        let rewrites = compile_rewrites(&config.rewrites)?;

        Ok(Self {
            default_handling: config.default_handling,
            rewrites,
            next,
            name: name.into(),
            observer,
        })
    }

    /// 미들웨어의 고유 이름을 반환합니다.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<B, H> Handler<B> for RedirectLocationMiddleware<H>
where
    B: Send + 'static,
    H: Handler<B>,
{
    async fn handle(&self, req: Request<B>, writer: &mut dyn ResponseWriter) {
        let forwarded = ForwardedContext::from_headers(req.headers());
        let mut interceptor = LocationInterceptor::new(
            self.default_handling,
            &self.rewrites,
            forwarded,
            self.observer.as_ref(),
            writer,
        );

        self.next.handle(req, &mut interceptor).await;
    }
}

/// 실제 라이터를 감싸 Location 헤더 교정을 수행하는 응답 라이터 래퍼
///
/// 헤더 접근과 바디 쓰기는 그대로 위임하고, 상태 코드 확정만
/// 가로챕니다.
pub struct LocationInterceptor<'a> {
    default_handling: bool,
    rewrites: &'a [Rewrite],
    forwarded: ForwardedContext,
    observer: &'a dyn RewriteObserver,
    writer: &'a mut dyn ResponseWriter,
}

impl<'a> LocationInterceptor<'a> {
    pub fn new(
        default_handling: bool,
        rewrites: &'a [Rewrite],
        forwarded: ForwardedContext,
        observer: &'a dyn RewriteObserver,
        writer: &'a mut dyn ResponseWriter,
    ) -> Self {
        Self {
            default_handling,
            rewrites,
            forwarded,
            observer,
            writer,
        }
    }

    /// 리다이렉트 범위는 300 초과 400 미만입니다. 300과 400 자체는
    /// 포함하지 않습니다.
    fn is_redirect(status: StatusCode) -> bool {
        let code = status.as_u16();
        code > 300 && code < 400
    }

    fn rewrite_location(&mut self) -> Result<(), MiddlewareError> {
        let mut location = self
            .writer
            .headers_mut()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if self.default_handling {
            location = reconcile_prefix(&location, &self.forwarded, self.observer)?;
        }

        location = apply_rewrites(self.rewrites, location, self.observer);

        match HeaderValue::from_str(&location) {
            Ok(value) => {
                self.writer.headers_mut().insert(header::LOCATION, value);
            }
            Err(err) => {
                warn!(
                    location = %location,
                    error = %err,
                    "재작성된 Location 값이 유효한 헤더 값이 아닙니다"
                );
            }
        }

        Ok(())
    }
}

impl ResponseWriter for LocationInterceptor<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.writer.headers_mut()
    }

    fn write_body(&mut self, chunk: Bytes) {
        self.writer.write_body(chunk);
    }

    fn write_status(&mut self, status: StatusCode) {
        if Self::is_redirect(status) && (self.default_handling || !self.rewrites.is_empty()) {
            if let Err(err) = self.rewrite_location() {
                // 파싱할 수 없는 리다이렉트 대상은 그대로 흘려보내지 않고
                // 500으로 응답합니다.
                write_error_response(self.writer, &err);
                return;
            }
        }

        self.writer.write_status(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::ResponseCapture;

    fn interceptor_config(default_handling: bool) -> RedirectLocationConfig {
        RedirectLocationConfig {
            default_handling,
            rewrites: Vec::new(),
        }
    }

    #[test]
    fn test_redirect_range() {
        for code in [301, 302, 303, 307, 308, 399] {
            assert!(LocationInterceptor::is_redirect(
                StatusCode::from_u16(code).unwrap()
            ));
        }
        for code in [200, 300, 400, 404, 500] {
            assert!(!LocationInterceptor::is_redirect(
                StatusCode::from_u16(code).unwrap()
            ));
        }
    }

    #[test]
    fn test_passthrough_without_config() {
        // 기본 처리도 규칙도 없으면 리다이렉트라도 헤더를 건드리지 않습니다.
        let config = interceptor_config(false);
        let rewrites = compile_rewrites(&config.rewrites).unwrap();
        let mut capture = ResponseCapture::new();

        let mut interceptor = LocationInterceptor::new(
            false,
            &rewrites,
            ForwardedContext::default(),
            &TracingObserver,
            &mut capture,
        );
        interceptor.write_status(StatusCode::MOVED_PERMANENTLY);

        assert_eq!(capture.status(), Some(StatusCode::MOVED_PERMANENTLY));
        assert!(capture.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn test_malformed_location_short_circuits() {
        let rewrites = Vec::new();
        let mut capture = ResponseCapture::new();
        capture
            .headers_mut()
            .insert(header::LOCATION, HeaderValue::from_static("http://[::1"));

        let mut interceptor = LocationInterceptor::new(
            true,
            &rewrites,
            ForwardedContext::default(),
            &TracingObserver,
            &mut capture,
        );
        interceptor.write_status(StatusCode::FOUND);

        // 원래 확정 호출은 일어나지 않고 500이 기록됩니다.
        assert_eq!(capture.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(capture.headers()[header::LOCATION], "http://[::1");
        assert!(!capture.body().is_empty());
    }

    #[test]
    fn test_body_write_delegates() {
        let rewrites = Vec::new();
        let mut capture = ResponseCapture::new();

        let mut interceptor = LocationInterceptor::new(
            true,
            &rewrites,
            ForwardedContext::default(),
            &TracingObserver,
            &mut capture,
        );
        interceptor.write_body(Bytes::from_static(b"hello"));

        assert_eq!(capture.body(), b"hello");
    }
}
