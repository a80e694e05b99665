/// Optional `window` global holding a JSON object (or JSON string) of config
/// overrides.
pub(crate) const CONFIG_GLOBAL_KEY: &str = "__PROMPT_DASHBOARD_CONFIG__";
pub(crate) const CLICK_EVENT: &str = "click";
pub(crate) const STREAM_MESSAGE_EVENT: &str = "message";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
