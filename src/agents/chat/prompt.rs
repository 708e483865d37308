pub const SYSTEM_INSTRUCTION: &str = "You are the AI assistant for Reelin, a premium AI automation agency. Your tone is professional, concise, futuristic, and helpful. You use Google Search to provide up-to-date information when relevant.";

pub const WELCOME_MESSAGE: &str = "Greetings. I am Reelin's AI assistant. How can I help you optimize your infrastructure today?";

// 服务没有返回文本时使用
pub const EMPTY_REPLY_FALLBACK: &str = "I apologize, I couldn't process that request.";

// 网络或服务错误时使用
pub const CONNECTION_FALLBACK: &str = "System connection interrupted. Please try again later.";
