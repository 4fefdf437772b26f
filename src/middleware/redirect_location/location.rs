use hyper::HeaderMap;
use url::{ParseError, Url};

use super::observer::RewriteObserver;
use crate::middleware::MiddlewareError;

/// 프록시가 설정하는 원본 호스트 헤더
pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";
/// 프록시가 제거한 경로 프리픽스 헤더
pub const FORWARDED_PREFIX_HEADER: &str = "x-forwarded-prefix";

/// 요청마다 인바운드 헤더에서 파생되는 포워딩 컨텍스트
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardedContext {
    /// 클라이언트가 본 원본 호스트 (없으면 빈 문자열)
    pub host: String,
    /// 프록시가 제거한 경로 프리픽스 (없으면 빈 문자열)
    pub prefix: String,
}

impl ForwardedContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header_value = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };

        Self {
            host: header_value(FORWARDED_HOST_HEADER),
            prefix: header_value(FORWARDED_PREFIX_HEADER),
        }
    }
}

/// 기본 프리픽스 보정을 수행합니다.
///
/// Location이 상대 참조이거나 포워딩된 호스트를 가리키는 경우에만
/// 프리픽스를 복원합니다. 이미 프리픽스로 시작하는 경로는 그대로
/// 두므로, 자기 출력에 다시 적용해도 결과가 변하지 않습니다.
///
/// 절대 URL로 보이는 값이 파싱되지 않으면 하드 에러입니다.
pub fn reconcile_prefix(
    location: &str,
    forwarded: &ForwardedContext,
    observer: &dyn RewriteObserver,
) -> Result<String, MiddlewareError> {
    match Url::parse(location) {
        Ok(mut url) => {
            // mailto: 같은 불투명 URL에는 경로 프리픽스 개념이 없습니다.
            if url.cannot_be_a_base() {
                return Ok(location.to_string());
            }

            // 다른 호스트를 가리키는 리다이렉트는 건드리지 않습니다.
            let host = url.host_str().unwrap_or("");
            if !host.is_empty() && host != forwarded.host {
                return Ok(location.to_string());
            }

            let path = url.path().to_string();
            if !needs_prefix(&path, &forwarded.prefix) {
                return Ok(location.to_string());
            }

            let new_path = join_prefix(&forwarded.prefix, &path);
            observer.on_prefix_applied(&path, &new_path);
            url.set_path(&new_path);
            Ok(url.to_string())
        }
        Err(ParseError::RelativeUrlWithoutBase) => {
            // 네트워크 경로 참조(`//host/path`)는 호스트를 포함하므로
            // 절대 URL과 같은 호스트 검사를 거칩니다.
            if location.starts_with("//") {
                return reconcile_network_path(location, forwarded, observer);
            }

            // 상대 참조: 경로만 보정하고 쿼리/프래그먼트는 보존합니다.
            let split = location
                .find(|c| c == '?' || c == '#')
                .unwrap_or(location.len());
            let (path, suffix) = location.split_at(split);

            if !needs_prefix(path, &forwarded.prefix) {
                return Ok(location.to_string());
            }

            let new_path = join_prefix(&forwarded.prefix, path);
            observer.on_prefix_applied(path, &new_path);
            Ok(format!("{}{}", new_path, suffix))
        }
        Err(err) => Err(MiddlewareError::MalformedLocation {
            location: location.to_string(),
            message: err.to_string(),
        }),
    }
}

/// 네트워크 경로 참조(`//host/path`)를 보정합니다.
///
/// 스킴만 빠진 절대 URL이므로 임시 스킴을 붙여 파싱한 뒤
/// 절대 URL과 동일한 호스트/프리픽스 검사를 적용하고,
/// 결과를 다시 스킴 없는 형태로 되돌립니다.
fn reconcile_network_path(
    location: &str,
    forwarded: &ForwardedContext,
    observer: &dyn RewriteObserver,
) -> Result<String, MiddlewareError> {
    let mut url = Url::parse(&format!("http:{}", location)).map_err(|err| {
        MiddlewareError::MalformedLocation {
            location: location.to_string(),
            message: err.to_string(),
        }
    })?;

    let host = url.host_str().unwrap_or("");
    if !host.is_empty() && host != forwarded.host {
        return Ok(location.to_string());
    }

    let path = url.path().to_string();
    if !needs_prefix(&path, &forwarded.prefix) {
        return Ok(location.to_string());
    }

    let new_path = join_prefix(&forwarded.prefix, &path);
    observer.on_prefix_applied(&path, &new_path);
    url.set_path(&new_path);

    let serialized = url.to_string();
    let without_scheme = serialized.strip_prefix("http:").unwrap_or(&serialized);
    Ok(without_scheme.to_string())
}

/// 경로에 프리픽스를 덧붙여야 하는지 판단합니다.
///
/// 양쪽 모두 선행 `/` 하나를 제거한 뒤 비교하므로 빈 프리픽스는
/// 항상 보정 대상이 아닙니다.
fn needs_prefix(path: &str, prefix: &str) -> bool {
    let path = path.strip_prefix('/').unwrap_or(path);
    let prefix = prefix.strip_prefix('/').unwrap_or(prefix);
    !path.starts_with(prefix)
}

/// 프리픽스와 경로를 구분자 `/` 하나로 연결하고 중복 슬래시를 제거합니다.
fn join_prefix(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        return collapse_slashes(prefix);
    }
    collapse_slashes(&format!("{}/{}", prefix, path))
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if last_slash {
                continue;
            }
            last_slash = true;
        } else {
            last_slash = false;
        }
        out.push(ch);
    }
    out
}
