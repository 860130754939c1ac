// Transcript text shown to the user
pub const FALLBACK_MESSAGE: &str = "Xin lỗi, đã có lỗi xảy ra. Vui lòng thử lại.";
pub const TIMEOUT_MESSAGE: &str = "Máy chủ phản hồi quá lâu. Vui lòng thử lại.";
pub const DEFAULT_GREETING: &str = "Book store xin chào! Tôi có thể giúp gì cho bạn?";

// Endpoint constants
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const CHAT_PATH: &str = "/chat";
pub const HISTORY_PATH: &str = "/history";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HISTORY_TIMEOUT_SECS: u64 = 5;

// Environment overrides
pub const ENDPOINT_ENV: &str = "CHAT_ENDPOINT";
pub const LOG_LEVEL_ENV: &str = "CHAT_LOG_LEVEL";

// UI constants
pub const USER_LABEL: &str = "Bạn";
pub const BOT_LABEL: &str = "Bot";
pub const INPUT_PREFIX: &str = "→ ";
pub const SHUTDOWN_GRACE_MS: u64 = 2000;
pub const PAGE_SCROLL_LINES: u16 = 5;
pub const TICK_RATE_MS: u64 = 100;
