use bytes::{Bytes, BytesMut};
use http_body_util::Full;
use hyper::header::{self, HeaderValue};
use hyper::{HeaderMap, Response, StatusCode};

use super::{MiddlewareError, ResponseWriter};

/// 응답을 메모리에 수집하는 ResponseWriter 구현
///
/// 호스팅 서버 경계에서 버퍼링 어댑터로 쓰이며, 테스트에서는
/// 레코더 역할을 합니다.
#[derive(Debug, Default)]
pub struct ResponseCapture {
    headers: HeaderMap,
    body: BytesMut,
    status: Option<StatusCode>,
}

impl ResponseCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// 확정된 상태 코드를 반환합니다. write_status 호출 전이면 None입니다.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// 수집한 내용을 hyper 응답으로 변환합니다.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for ResponseCapture {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_body(&mut self, chunk: Bytes) {
        self.body.extend_from_slice(&chunk);
    }

    fn write_status(&mut self, status: StatusCode) {
        // 최초 호출만 반영
        if self.status.is_none() {
            self.status = Some(status);
        }
    }
}

/// 미들웨어 에러를 HTTP 오류 응답으로 기록합니다.
pub fn write_error_response(writer: &mut dyn ResponseWriter, err: &MiddlewareError) {
    let status = match err {
        MiddlewareError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        MiddlewareError::MalformedLocation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    writer.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    writer.write_status(status);
    writer.write_body(Bytes::from(err.to_string()));
}
