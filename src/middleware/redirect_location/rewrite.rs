use regex_lite::Regex;

use super::config::RewriteConfig;
use super::observer::RewriteObserver;
use crate::middleware::MiddlewareError;

/// 컴파일된 재작성 규칙
///
/// 정규식은 미들웨어 생성 시 한 번만 컴파일되며 요청 처리 중에는
/// 다시 컴파일되지 않습니다.
#[derive(Debug)]
pub struct Rewrite {
    regex: Regex,
    replacement: String,
}

impl Rewrite {
    pub fn new(config: &RewriteConfig) -> Result<Self, MiddlewareError> {
        let regex = Regex::new(&config.regex).map_err(|e| {
            MiddlewareError::Config(format!("정규식 {:?} 컴파일 실패: {}", config.regex, e))
        })?;

        Ok(Self {
            regex,
            replacement: config.replacement.clone(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// 겹치지 않는 모든 매치를 치환합니다.
    pub fn apply(&self, input: &str) -> String {
        self.regex
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }
}

/// 설정 목록 전체를 컴파일합니다. 규칙 하나라도 잘못되면 전체가 실패합니다.
pub fn compile_rewrites(configs: &[RewriteConfig]) -> Result<Vec<Rewrite>, MiddlewareError> {
    configs.iter().map(Rewrite::new).collect()
}

/// 규칙을 설정된 순서대로 적용합니다.
///
/// 각 규칙의 출력이 다음 규칙의 입력이 됩니다.
pub fn apply_rewrites(
    rewrites: &[Rewrite],
    mut location: String,
    observer: &dyn RewriteObserver,
) -> String {
    for rewrite in rewrites {
        let rewritten = rewrite.apply(&location);
        if rewritten != location {
            observer.on_rewrite_applied(rewrite.pattern(), &location, &rewritten);
        }
        location = rewritten;
    }
    location
}
