//! Route paths.

pub const GET_API_HEALTH: &str = "/api/health";
pub const POST_REGISTER_USER: &str = "/opensensemap/registerUser";
pub const POST_LOGIN: &str = "/opensensemap/login";
pub const POST_SENSEBOX: &str = "/opensensemap/sensebox";
pub const GET_SENSEBOX_ID: &str = "/opensensemap/sensebox/{id}";
pub const POST_LOGOUT: &str = "/opensensemap/logout";
