/// Static route classification consulted by the access gate. Built once at
/// startup; patterns other than "/" also match any sub-path.
#[derive(Clone, Debug)]
pub struct RouteTable {
    public: Vec<String>,
    public_api: Vec<String>,
    pub dashboard_path: String,
    pub sign_in_path: String,
}

impl RouteTable {
    pub fn standard() -> Self {
        Self {
            public: vec![
                "/".to_string(),
                "/sign-in".to_string(),
                "/sign-up".to_string(),
                "/health".to_string(),
            ],
            public_api: vec![
                "/api/videos".to_string(),
                "/api/social-formats".to_string(),
            ],
            dashboard_path: "/home".to_string(),
            sign_in_path: "/sign-in".to_string(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|pattern| matches(pattern, path))
    }

    pub fn is_public_api(&self, path: &str) -> bool {
        self.public_api.iter().any(|pattern| matches(pattern, path))
    }
}

fn matches(pattern: &str, path: &str) -> bool {
    if pattern == "/" {
        return path == "/";
    }
    path == pattern || path.starts_with(&format!("{}/", pattern))
}
