pub mod types;

/// Route prefixes of the backend-for-frontend.
pub mod routes {
    pub const CHAT: &str = "/api/backend-llm/chat";
    pub const SESSIONS: &str = "/api/backend-da/sessions";
    pub const PROMPTS: &str = "/api/backend-da/prompts";
    pub const QUOTA: &str = "/api/backend-da/quota";
    pub const SYSTEM_PROMPTS: &str = "/api/backend-da/system-prompts";
    pub const USER_PROMPTS: &str = "/api/backend-da/user-prompts";
}
