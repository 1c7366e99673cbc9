use crate::error::ApiError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub code: i32,
    #[serde(default)]
    pub msg: Option<String>,
}

/// The `{status, result}` wrapper around every backend response. A body
/// without `status.code` is not an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl Envelope {
    /// Parses a response body. `http_status` is the transport status code;
    /// only a 2xx answer carrying code 0 counts as success.
    pub fn parse(http_status: u16, body: &str, not_logged_in_code: i32) -> Result<Self, ApiError> {
        if http_status == 401 {
            return Err(ApiError::NotAuthenticated);
        }
        let success = (200..300).contains(&http_status);
        let envelope = serde_json::from_str::<Envelope>(body).map_err(|err| {
            if success {
                ApiError::Decode(err.to_string())
            } else {
                ApiError::Transport(format!("HTTP {http_status}"))
            }
        })?;
        let envelope = envelope.check(not_logged_in_code)?;
        if success {
            return Ok(envelope);
        }
        Err(ApiError::Application {
            code: envelope.status.code,
            msg: envelope
                .status
                .msg
                .filter(|x| !x.is_empty())
                .unwrap_or_else(|| format!("HTTP {http_status}")),
        })
    }

    fn check(self, not_logged_in_code: i32) -> Result<Self, ApiError> {
        match self.status.code {
            0 => Ok(self),
            code if code == not_logged_in_code => Err(ApiError::NotAuthenticated),
            code => Err(ApiError::Application {
                code,
                msg: self.status.msg.unwrap_or_default(),
            }),
        }
    }

    /// The decoded result of a successful call. A missing result is an error.
    pub fn result<T: serde::de::DeserializeOwned>(self) -> Result<T, ApiError> {
        match self.result {
            None | Some(serde_json::Value::Null) => {
                Err(ApiError::Decode("response has no result".into()))
            }
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Like [`Envelope::result`], but a missing result becomes `T::default()`.
    pub fn result_or_default<T: serde::de::DeserializeOwned + Default>(self) -> Result<T, ApiError> {
        match self.result {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_LOGGED_IN: i32 = 403_001;

    #[test]
    fn zero_code_is_success() {
        let envelope = Envelope::parse(
            200,
            r#"{"status": {"code": 0, "msg": "OK"}, "result": 5}"#,
            NOT_LOGGED_IN,
        )
        .unwrap();
        assert_eq!(envelope.result::<u32>().unwrap(), 5);
    }

    #[test]
    fn application_errors_carry_code_and_message() {
        let err = Envelope::parse(
            200,
            r#"{"status": {"code": 100001, "msg": "content required"}}"#,
            NOT_LOGGED_IN,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::Application {
                code: 100_001,
                msg: "content required".into()
            }
        );
    }

    #[test]
    fn session_errors_are_distinguished() {
        let by_code = Envelope::parse(
            403,
            r#"{"status": {"code": 403001, "msg": "not logged in"}}"#,
            NOT_LOGGED_IN,
        );
        assert_eq!(by_code.unwrap_err(), ApiError::NotAuthenticated);
        assert_eq!(
            Envelope::parse(401, "", NOT_LOGGED_IN).unwrap_err(),
            ApiError::NotAuthenticated
        );
    }

    #[test]
    fn unparsable_bodies_depend_on_http_status() {
        assert!(matches!(
            Envelope::parse(502, "<html>Bad gateway</html>", NOT_LOGGED_IN),
            Err(ApiError::Transport(_))
        ));
        assert!(matches!(
            Envelope::parse(200, "not json", NOT_LOGGED_IN),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn bodies_without_a_status_are_never_success() {
        assert!(matches!(
            Envelope::parse(500, r#"{"message": "Internal Server Error"}"#, NOT_LOGGED_IN),
            Err(ApiError::Transport(_))
        ));
        assert!(matches!(
            Envelope::parse(200, "{}", NOT_LOGGED_IN),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            Envelope::parse(200, r#"{"status": {"msg": "OK"}}"#, NOT_LOGGED_IN),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn failed_http_status_overrides_a_zero_code() {
        let err = Envelope::parse(500, r#"{"status": {"code": 0}}"#, NOT_LOGGED_IN).unwrap_err();
        assert_eq!(
            err,
            ApiError::Application {
                code: 0,
                msg: "HTTP 500".into()
            }
        );
        let err = Envelope::parse(
            400,
            r#"{"status": {"code": 100001, "msg": "content required"}}"#,
            NOT_LOGGED_IN,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::Application {
                code: 100_001,
                msg: "content required".into()
            }
        );
    }

    #[test]
    fn missing_result_only_fails_when_required() {
        let envelope =
            Envelope::parse(200, r#"{"status": {"code": 0}}"#, NOT_LOGGED_IN).unwrap();
        assert!(envelope.clone().result::<String>().is_err());
        assert_eq!(envelope.result_or_default::<Vec<u32>>().unwrap(), Vec::<u32>::new());
    }
}
