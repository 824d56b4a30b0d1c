//! Application-level configuration constants.

// Timer
pub const TICK_INTERVAL_MS: u32 = 1_000;

// Second-window display
pub const MIRROR_CHANNEL: &str = "demo-timer-display";
pub const DISPLAY_QUERY_FLAG: &str = "display=true";

// Checklist
pub const DEFAULT_MINUTES: &str = "0";
pub const AGENDA_PLACEHOLDER: &str = "Set up topics and press Start.";
pub const OPEN_DISPLAY_HINT: &str = "Open this page in a second, maximized browser window (F11) and add '?display=true' to the end of the address to use the full-screen timer display.";

pub const TOPICS: [&str; 36] = [
    "Inbound Voice",
    "Chat",
    "SMS 1:1",
    "Email",
    "Whatsapp",
    "Other",
    "Navigator",
    "Identity",
    "Guardian",
    "Workspace Designer",
    "Copilot",
    "Knowledge Management",
    "Autopilot",
    "Multi-Agent Orchestration",
    "Video/ Cobrowse",
    "Cases",
    "Integrations",
    "Client 360",
    "Online Banking",
    "CRM",
    "UCaaS",
    "Other (please specify)",
    "Builder Automations",
    "Outbound: Automated Notifications",
    "Proactive Notifications",
    "Native Preview Dialer",
    "Talkdesk Dialer for Salesforce",
    "Noetica Advanced Dialer",
    "Quality Management",
    "Feedback",
    "Performance Management",
    "WFM",
    "Live",
    "Explore",
    "Studio",
    "Admin",
];
