//! Resources managed through the console

use serde::{Deserialize, Serialize};

/// Backend collections the console manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Categories,
    Products,
    Courses,
    Orders,
    Banners,
    GiftConfig,
    ContactMessages,
    AuditLogs,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Categories,
        Resource::Products,
        Resource::Courses,
        Resource::Orders,
        Resource::Banners,
        Resource::GiftConfig,
        Resource::ContactMessages,
        Resource::AuditLogs,
    ];

    /// Collection path, relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Categories => "/categories",
            Resource::Products => "/products",
            Resource::Courses => "/courses",
            Resource::Orders => "/orders",
            Resource::Banners => "/banners",
            Resource::GiftConfig => "/gift-config",
            Resource::ContactMessages => "/contact-messages",
            Resource::AuditLogs => "/audit-logs",
        }
    }

    /// Path of a single item in the collection
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path(), urlencoding::encode(id))
    }

    /// Field name a list response may nest its items under
    pub fn collection_key(&self) -> &'static str {
        match self {
            Resource::Categories => "categories",
            Resource::Products => "products",
            Resource::Courses => "courses",
            Resource::Orders => "orders",
            Resource::Banners => "banners",
            Resource::GiftConfig => "gifts",
            Resource::ContactMessages => "messages",
            Resource::AuditLogs => "logs",
        }
    }

    /// Singular label for log lines and prompts
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Categories => "category",
            Resource::Products => "product",
            Resource::Courses => "course",
            Resource::Orders => "order",
            Resource::Banners => "banner",
            Resource::GiftConfig => "gift config",
            Resource::ContactMessages => "contact message",
            Resource::AuditLogs => "audit log",
        }
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/');
        Resource::ALL
            .into_iter()
            .find(|r| r.path().trim_start_matches('/') == wanted)
            .ok_or_else(|| format!("unknown resource: {s}"))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Resource::GiftConfig.path(), "/gift-config");
        assert_eq!(Resource::Products.item_path("abc123"), "/products/abc123");
        assert_eq!(Resource::Products.item_path("a/b"), "/products/a%2Fb");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("products".parse::<Resource>(), Ok(Resource::Products));
        assert_eq!("/audit-logs".parse::<Resource>(), Ok(Resource::AuditLogs));
        assert!("widgets".parse::<Resource>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for r in Resource::ALL {
            assert_eq!(r.to_string().parse::<Resource>(), Ok(r));
        }
    }

    #[test]
    fn test_serde_kebab() {
        let json = serde_json::to_string(&Resource::ContactMessages).unwrap();
        assert_eq!(json, "\"contact-messages\"");
    }
}
