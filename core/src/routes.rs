//! Route table for the backend API and the admin pages.
//!
//! Static paths are constants; per-record paths are built from the record
//! id. Ids are inserted verbatim as one path segment.

pub mod auth {
    pub const LOGIN: &str = "/users/login";
    pub const LOGOUT: &str = "/users/logout";
}

pub mod user {
    pub const ME: &str = "/users/me";
}

pub mod education {
    pub const GET_ALL: &str = "/education";
    pub const CREATE: &str = "/education";

    pub fn update(id: &str) -> String {
        format!("{GET_ALL}/{id}")
    }

    pub fn delete(id: &str) -> String {
        format!("{GET_ALL}/{id}")
    }
}

pub mod experience {
    pub const GET_ALL: &str = "/experiences";
    pub const CREATE: &str = "/experiences";

    pub fn update(id: &str) -> String {
        format!("{GET_ALL}/{id}")
    }

    pub fn delete(id: &str) -> String {
        format!("{GET_ALL}/{id}")
    }
}

pub mod project {
    pub const GET_ALL: &str = "/projects";
    pub const CREATE: &str = "/projects";

    pub fn update(id: &str) -> String {
        format!("{GET_ALL}/{id}")
    }

    pub fn delete(id: &str) -> String {
        format!("{GET_ALL}/{id}")
    }
}

/// Frontend pages the admin flow redirects between.
pub mod admin {
    pub const LOGIN: &str = "/admin/login";
    pub const DASHBOARD: &str = "/admin/dashboard";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_routes_embed_id() {
        assert_eq!(education::update("e1"), "/education/e1");
        assert_eq!(experience::delete("x-9"), "/experiences/x-9");
        assert_eq!(project::update("42"), "/projects/42");
    }
}
