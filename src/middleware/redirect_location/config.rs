use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::middleware::MiddlewareError;

/// 재작성 규칙 정의
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RewriteConfig {
    /// 매칭할 정규식
    #[serde(default)]
    pub regex: String,

    /// 치환 템플릿 ($1 형태의 캡처 참조 지원)
    #[serde(default)]
    pub replacement: String,
}

/// Location 교정 미들웨어 설정
///
/// # Docker 라벨 예시
///
/// ```yaml
/// labels:
///   - "rproxy.http.middlewares.my-redirect.type=redirect-location"
///   - "rproxy.http.middlewares.my-redirect.redirectLocation.default=true"
///   - "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.0.regex=^http://(.+)$"
///   - "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.0.replacement=https://$1"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RedirectLocationConfig {
    /// 기본 프리픽스 보정 활성화 여부
    #[serde(default, rename = "default")]
    pub default_handling: bool,

    /// 순서대로 적용할 재작성 규칙 목록
    #[serde(default)]
    pub rewrites: Vec<RewriteConfig>,
}

impl RedirectLocationConfig {
    /// Docker 라벨에서 설정을 파싱합니다.
    ///
    /// 재작성 규칙은 `rewrites.<index>.regex` / `rewrites.<index>.replacement`
    /// 형태로 지정하며, 인덱스 순서가 적용 순서가 됩니다.
    pub fn from_labels(
        labels: &HashMap<String, String>,
        name: &str,
    ) -> Result<Self, MiddlewareError> {
        let prefix = format!("rproxy.http.middlewares.{}.redirectLocation.", name);

        let mut config = Self::default();
        let mut rewrites: BTreeMap<usize, RewriteConfig> = BTreeMap::new();

        for (key, value) in labels {
            if let Some(rest) = key.strip_prefix(&prefix) {
                if rest == "default" {
                    config.default_handling = value.to_lowercase() == "true";
                } else if let Some(rule_key) = rest.strip_prefix("rewrites.") {
                    let mut parts = rule_key.splitn(2, '.');
                    let index = parts
                        .next()
                        .and_then(|i| i.parse::<usize>().ok())
                        .ok_or_else(|| {
                            MiddlewareError::Config(format!("잘못된 재작성 라벨: {}", key))
                        })?;
                    let field = parts.next().ok_or_else(|| {
                        MiddlewareError::Config(format!("잘못된 재작성 라벨: {}", key))
                    })?;

                    let entry = rewrites.entry(index).or_default();
                    match field {
                        "regex" => entry.regex = value.clone(),
                        "replacement" => entry.replacement = value.clone(),
                        _ => {
                            return Err(MiddlewareError::Config(format!(
                                "알 수 없는 재작성 필드: {}",
                                field
                            )))
                        }
                    }
                }
            }
        }

        config.rewrites = rewrites.into_values().collect();
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// JSON 문자열에서 설정을 파싱합니다.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_labels() {
        let mut labels = HashMap::new();
        labels.insert(
            "rproxy.http.middlewares.my-redirect.redirectLocation.default".to_string(),
            "true".to_string(),
        );
        labels.insert(
            "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.1.regex".to_string(),
            "foo".to_string(),
        );
        labels.insert(
            "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.1.replacement"
                .to_string(),
            "bar".to_string(),
        );
        labels.insert(
            "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.0.regex".to_string(),
            "^http://(.+)$".to_string(),
        );
        labels.insert(
            "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.0.replacement"
                .to_string(),
            "https://$1".to_string(),
        );

        let config = RedirectLocationConfig::from_labels(&labels, "my-redirect").unwrap();

        assert!(config.default_handling);
        assert_eq!(config.rewrites.len(), 2);
        // 인덱스 순서가 적용 순서
        assert_eq!(config.rewrites[0].regex, "^http://(.+)$");
        assert_eq!(config.rewrites[1].regex, "foo");
    }

    #[test]
    fn test_config_from_labels_ignores_other_middlewares() {
        let mut labels = HashMap::new();
        labels.insert(
            "rproxy.http.middlewares.other.redirectLocation.default".to_string(),
            "true".to_string(),
        );

        let config = RedirectLocationConfig::from_labels(&labels, "my-redirect").unwrap();
        assert!(!config.default_handling);
        assert!(config.rewrites.is_empty());
    }

    #[test]
    fn test_config_from_labels_invalid_index() {
        let mut labels = HashMap::new();
        labels.insert(
            "rproxy.http.middlewares.my-redirect.redirectLocation.rewrites.abc.regex".to_string(),
            "foo".to_string(),
        );

        assert!(RedirectLocationConfig::from_labels(&labels, "my-redirect").is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            default = true

            [[rewrites]]
            regex = "^http://(.+)$"
            replacement = "https://$1"
        "#;

        let config = RedirectLocationConfig::from_toml(toml_str).unwrap();
        assert!(config.default_handling);
        assert_eq!(config.rewrites.len(), 1);
        assert_eq!(config.rewrites[0].replacement, "https://$1");
    }

    #[test]
    fn test_config_from_json() {
        let json_str = r#"{
            "default": false,
            "rewrites": [
                { "regex": "foo", "replacement": "bar" }
            ]
        }"#;

        let config = RedirectLocationConfig::from_json(json_str).unwrap();
        assert!(!config.default_handling);
        assert_eq!(config.rewrites[0].regex, "foo");
    }

    #[test]
    fn test_config_defaults() {
        let config = RedirectLocationConfig::from_json("{}").unwrap();
        assert!(!config.default_handling);
        assert!(config.rewrites.is_empty());
    }
}
