//! Client configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

/// Default Wolai open API base URL.
pub const DEFAULT_API_URL: &str = "https://openapi.wolai.com/v1";

/// Where users create apps and obtain credentials.
pub const CREDENTIALS_URL: &str = "https://www.wolai.com/dev";

/// Environment variable holding the app ID.
pub const ENV_APP_ID: &str = "WOLAI_APP_ID";

/// Environment variable holding the app secret.
pub const ENV_APP_SECRET: &str = "WOLAI_APP_SECRET";

/// Environment variable holding the default root page ID.
pub const ENV_ROOT_ID: &str = "WOLAI_ROOT_ID";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "WOLAI_API_URL";

/// Default depth for title search. Each level costs two requests per node,
/// so this stays shallow.
pub const DEFAULT_SEARCH_DEPTH: u32 = 2;

/// Page size requested from the children endpoint.
pub const CHILDREN_PAGE_SIZE: u32 = 200;

/// Circuit breaker for cursor pagination on a single children listing.
pub const MAX_CHILDREN_PAGES: usize = 50;

/// Separator between breadcrumb titles.
pub const BREADCRUMB_SEPARATOR: &str = " > ";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("wolai-mcp/", env!("CARGO_PKG_VERSION"));
