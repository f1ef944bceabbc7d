//! Page routes and the query parameters the OAuth redirects carry

pub const LANDING_PATH: &str = "/";
pub const HOME_PATH: &str = "/home";
pub const PROFILE_PATH: &str = "/profile";
pub const PROJECTS_PATH: &str = "/projects";
pub const CALLBACK_PATH: &str = "/auth/callback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Landing,
    Home,
    Profile,
    Projects,
    AuthCallback,
}

impl Route {
    /// Unknown paths land on the landing page
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Landing,
            HOME_PATH | "/dashboard" => Route::Home,
            PROFILE_PATH => Route::Profile,
            PROJECTS_PATH => Route::Projects,
            CALLBACK_PATH => Route::AuthCallback,
            _ => Route::Landing,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => LANDING_PATH,
            Route::Home => HOME_PATH,
            Route::Profile => PROFILE_PATH,
            Route::Projects => PROJECTS_PATH,
            Route::AuthCallback => CALLBACK_PATH,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Home | Route::Profile | Route::Projects)
    }
}

/// Decode `?a=1&b=two` into pairs. Keys without a value map to "".
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

fn query_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
}

/// Session handed over by the backend in a redirect URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub username: String,
    pub token: String,
    pub user_id: Option<String>,
}

impl LoginRedirect {
    /// `/home?token=..&username=..&user_id=..`
    pub fn from_home_query(search: &str) -> Option<Self> {
        let pairs = parse_query(search);
        Some(Self {
            token: query_value(&pairs, "token")?,
            username: query_value(&pairs, "username")?,
            user_id: query_value(&pairs, "user_id"),
        })
    }

    /// `/auth/callback?access_token=..&username=..`
    pub fn from_callback_query(search: &str) -> Option<Self> {
        let pairs = parse_query(search);
        Some(Self {
            token: query_value(&pairs, "access_token")?,
            username: query_value(&pairs, "username")?,
            user_id: query_value(&pairs, "user_id"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_from_paths() {
        assert_eq!(Route::from_path("/"), Route::Landing);
        assert_eq!(Route::from_path("/home/"), Route::Home);
        assert_eq!(Route::from_path("/auth/callback"), Route::AuthCallback);
        assert_eq!(Route::from_path("/nope"), Route::Landing);
        assert!(Route::Profile.requires_auth());
        assert!(!Route::AuthCallback.requires_auth());
    }

    #[test]
    fn home_redirect_uses_token_param() {
        let login = LoginRedirect::from_home_query("?token=abc&username=octo%20cat&user_id=7").unwrap();
        assert_eq!(login.token, "abc");
        assert_eq!(login.username, "octo cat");
        assert_eq!(login.user_id.as_deref(), Some("7"));
        assert_eq!(LoginRedirect::from_home_query("?access_token=abc&username=octo"), None);
    }

    #[test]
    fn callback_redirect_uses_access_token_param() {
        let login = LoginRedirect::from_callback_query("access_token=xyz&username=octo").unwrap();
        assert_eq!(login.token, "xyz");
        assert_eq!(login.user_id, None);
        assert_eq!(LoginRedirect::from_callback_query("?token=xyz&username=octo"), None);
    }

    #[test]
    fn empty_values_count_as_missing() {
        assert_eq!(LoginRedirect::from_home_query("?token=&username=octo"), None);
        assert_eq!(parse_query(""), Vec::<(String, String)>::new());
        assert_eq!(parse_query("?flag"), vec![("flag".to_string(), String::new())]);
    }
}
