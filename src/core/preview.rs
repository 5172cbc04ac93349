use crate::domain::ports::ConfigProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewResponse {
    /// Redirect the browser; `preview` is the draft-mode state to persist.
    Redirect { location: String, preview: bool },
    Unauthorized { message: String },
}

impl PreviewResponse {
    pub fn status(&self) -> u16 {
        match self {
            PreviewResponse::Redirect { .. } => 307,
            PreviewResponse::Unauthorized { .. } => 401,
        }
    }
}

/// Forces a redirect target onto this site: always one leading slash, no
/// repeated or trailing slashes, no backslashes or control characters.
pub fn sanitize_redirect_path(slug: &str) -> String {
    let cleaned: String = slug
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '\\' { '/' } else { c })
        .collect();

    let segments: Vec<&str> = cleaned
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    format!("/{}", segments.join("/"))
}

/// Guards draft-content viewing behind a shared secret.
#[derive(Debug, Clone)]
pub struct PreviewGate {
    secret: Option<String>,
}

impl PreviewGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.preview_secret().map(str::to_string))
    }

    /// With no secret configured, preview can never be enabled.
    pub fn enable(&self, secret: Option<&str>, slug: Option<&str>) -> PreviewResponse {
        let authorised = match (&self.secret, secret) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        };

        if !authorised {
            tracing::warn!("Rejected preview request with invalid token");
            return PreviewResponse::Unauthorized {
                message: "Invalid token".to_string(),
            };
        }

        let location = sanitize_redirect_path(slug.unwrap_or_default());
        tracing::debug!("Preview enabled, redirecting to {}", location);
        PreviewResponse::Redirect {
            location,
            preview: true,
        }
    }

    pub fn exit(&self) -> PreviewResponse {
        PreviewResponse::Redirect {
            location: "/".to_string(),
            preview: false,
        }
    }
}
