// Static command -> REST endpoint table for remote mode.
//
// Native mode never consults this table; any command name is forwarded
// verbatim to the host. In remote mode a command missing from this table is
// a configuration defect and invoke rejects immediately.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// HTTP methods the remote API uses. The registry is the only place allowed
/// to pick one; callers never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// One remote endpoint. `url` may contain `:key` placeholders substituted
/// from the invoke args by exact key match.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub url: &'static str,
    pub method: HttpMethod,
}

const fn get(url: &'static str) -> Endpoint {
    Endpoint { url, method: HttpMethod::Get }
}

const fn post(url: &'static str) -> Endpoint {
    Endpoint { url, method: HttpMethod::Post }
}

const fn delete(url: &'static str) -> Endpoint {
    Endpoint { url, method: HttpMethod::Delete }
}

static COMMAND_ENDPOINTS: &[(&str, Endpoint)] = &[
    // =====================================================================
    // Accounts
    // =====================================================================
    ("list_accounts", get("/api/accounts")),
    ("get_current_account", get("/api/accounts/current")),
    ("switch_account", post("/api/accounts/switch")),
    ("add_account", post("/api/accounts")),
    ("delete_account", delete("/api/accounts/:accountId")),
    ("delete_accounts", post("/api/accounts/bulk-delete")),
    ("fetch_account_quota", get("/api/accounts/:accountId/quota")),
    ("refresh_account_quota", get("/api/accounts/:accountId/quota")),
    ("refresh_all_quotas", post("/api/accounts/refresh")),
    ("reorder_accounts", post("/api/accounts/reorder")),
    ("toggle_proxy_status", post("/api/accounts/:accountId/toggle-proxy")),
    ("warm_up_accounts", post("/api/accounts/warmup")),
    ("warm_up_all_accounts", post("/api/accounts/warmup")),
    ("warm_up_account", post("/api/accounts/:accountId/warmup")),
    ("bind_device_profile", post("/api/accounts/:accountId/bind-device")),
    ("get_device_profiles", get("/api/accounts/:accountId/device-profiles")),
    ("list_device_versions", get("/api/accounts/:accountId/device-versions")),
    ("preview_generate_profile", post("/api/accounts/device-preview")),
    (
        "bind_device_profile_with_profile",
        post("/api/accounts/:accountId/bind-device-profile"),
    ),
    ("restore_original_device", post("/api/accounts/restore-original")),
    (
        "restore_device_version",
        post("/api/accounts/:accountId/device-versions/:versionId/restore"),
    ),
    (
        "delete_device_version",
        delete("/api/accounts/:accountId/device-versions/:versionId"),
    ),
    ("open_device_folder", post("/api/system/open-folder")),
    // =====================================================================
    // Proxy control & status
    // =====================================================================
    ("get_proxy_status", get("/api/proxy/status")),
    ("start_proxy_service", post("/api/proxy/start")),
    ("stop_proxy_service", post("/api/proxy/stop")),
    ("update_model_mapping", post("/api/proxy/mapping")),
    ("generate_api_key", post("/api/proxy/api-key/generate")),
    ("clear_proxy_session_bindings", post("/api/proxy/session-bindings/clear")),
    ("clear_proxy_rate_limit", delete("/api/proxy/rate-limits/:accountId")),
    ("clear_all_proxy_rate_limits", delete("/api/proxy/rate-limits")),
    ("fetch_zai_models", post("/api/zai/models/fetch")),
    ("load_config", get("/api/config")),
    ("save_config", post("/api/config")),
    ("get_proxy_stats", get("/api/proxy/stats")),
    ("set_proxy_monitor_enabled", post("/api/proxy/monitor/toggle")),
    // =====================================================================
    // Logs & monitoring
    // =====================================================================
    ("get_proxy_logs_filtered", get("/api/logs")),
    ("get_proxy_logs_count_filtered", get("/api/logs/count")),
    ("clear_proxy_logs", post("/api/logs/clear")),
    ("get_proxy_log_detail", get("/api/logs/:log_id")),
    // =====================================================================
    // CLI sync
    // =====================================================================
    ("get_cli_sync_status", post("/api/proxy/cli/status")),
    ("execute_cli_sync", post("/api/proxy/cli/sync")),
    ("execute_cli_restore", post("/api/proxy/cli/restore")),
    ("get_cli_config_content", post("/api/proxy/cli/config")),
    // =====================================================================
    // OpenCode sync
    // =====================================================================
    ("get_opencode_sync_status", post("/api/proxy/opencode/status")),
    ("execute_opencode_sync", post("/api/proxy/opencode/sync")),
    ("execute_opencode_restore", post("/api/proxy/opencode/restore")),
    ("get_opencode_config_content", post("/api/proxy/opencode/config")),
    // =====================================================================
    // Token stats
    // =====================================================================
    ("get_token_stats_hourly", get("/api/stats/token/hourly")),
    ("get_token_stats_daily", get("/api/stats/token/daily")),
    ("get_token_stats_weekly", get("/api/stats/token/weekly")),
    ("get_token_stats_by_account", get("/api/stats/token/by-account")),
    ("get_token_stats_summary", get("/api/stats/token/summary")),
    ("get_token_stats_by_model", get("/api/stats/token/by-model")),
    ("get_token_stats_model_trend_hourly", get("/api/stats/token/model-trend/hourly")),
    ("get_token_stats_model_trend_daily", get("/api/stats/token/model-trend/daily")),
    (
        "get_token_stats_account_trend_hourly",
        get("/api/stats/token/account-trend/hourly"),
    ),
    (
        "get_token_stats_account_trend_daily",
        get("/api/stats/token/account-trend/daily"),
    ),
    // =====================================================================
    // System
    // =====================================================================
    ("get_data_dir_path", get("/api/system/data-dir")),
    ("save_text_file", post("/api/system/save-file")),
    ("get_update_settings", get("/api/system/updates/settings")),
    ("save_update_settings", post("/api/system/updates/save")),
    ("is_auto_launch_enabled", get("/api/system/autostart/status")),
    ("toggle_auto_launch", post("/api/system/autostart/toggle")),
    ("get_http_api_settings", get("/api/system/http-api/settings")),
    ("save_http_api_settings", post("/api/system/http-api/settings")),
    ("open_data_folder", post("/api/system/open-folder")),
    // =====================================================================
    // Cloudflared
    // =====================================================================
    ("cloudflared_install", post("/api/proxy/cloudflared/install")),
    ("cloudflared_start", post("/api/proxy/cloudflared/start")),
    ("cloudflared_stop", post("/api/proxy/cloudflared/stop")),
    ("cloudflared_get_status", get("/api/proxy/cloudflared/status")),
    // =====================================================================
    // Updates
    // =====================================================================
    ("should_check_updates", get("/api/system/updates/check-status")),
    ("check_for_updates", post("/api/system/updates/check")),
    ("update_last_check_time", post("/api/system/updates/touch")),
    // =====================================================================
    // OAuth
    // =====================================================================
    ("prepare_oauth_url", get("/api/auth/url")),
    ("start_oauth_login", post("/api/accounts/oauth/start")),
    ("complete_oauth_login", post("/api/accounts/oauth/complete")),
    ("cancel_oauth_login", post("/api/accounts/oauth/cancel")),
    ("submit_oauth_code", post("/api/accounts/oauth/submit-code")),
    // =====================================================================
    // Import
    // =====================================================================
    ("import_v1_accounts", post("/api/accounts/import/v1")),
    ("import_from_db", post("/api/accounts/import/db")),
    ("import_custom_db", post("/api/accounts/import/db-custom")),
    ("sync_account_from_db", post("/api/accounts/sync/db")),
    // =====================================================================
    // Security
    // =====================================================================
    ("security_init_db", post("/api/security/init")),
    ("security_get_blacklist", get("/api/security/blacklist")),
    ("security_get_whitelist", get("/api/security/whitelist")),
    ("security_add_to_blacklist", post("/api/security/blacklist")),
    ("security_add_to_whitelist", post("/api/security/whitelist")),
    (
        "security_remove_from_blacklist",
        delete("/api/security/blacklist/by-pattern/:ipPattern"),
    ),
    ("security_remove_from_blacklist_by_id", delete("/api/security/blacklist/:id")),
    (
        "security_remove_from_whitelist",
        delete("/api/security/whitelist/by-pattern/:ipPattern"),
    ),
    ("security_remove_from_whitelist_by_id", delete("/api/security/whitelist/:id")),
    ("security_is_ip_blacklisted", post("/api/security/blacklist/check")),
    ("security_is_ip_whitelisted", post("/api/security/whitelist/check")),
    ("security_get_access_logs", get("/api/security/logs")),
    ("security_cleanup_logs", post("/api/security/logs/cleanup")),
    ("security_clear_all_logs", delete("/api/security/logs")),
    ("security_get_stats", get("/api/security/stats")),
    ("security_clear_blacklist", delete("/api/security/blacklist/clear")),
    ("security_clear_whitelist", delete("/api/security/whitelist/clear")),
    ("security_get_ip_token_stats", get("/api/security/token-stats")),
    ("get_security_config", get("/api/security/config")),
    ("update_security_config", post("/api/security/config")),
    // =====================================================================
    // Proxy preferred account
    // =====================================================================
    ("get_preferred_account", get("/api/proxy/preferred-account")),
    ("set_preferred_account", post("/api/proxy/preferred-account")),
    // =====================================================================
    // Account export
    // =====================================================================
    ("export_accounts", post("/api/accounts/export")),
    ("export_accounts_by_ids", post("/api/accounts/export")),
];

/// Index built once at first use; the table itself never changes.
static INDEX: Lazy<HashMap<&'static str, &'static Endpoint>> = Lazy::new(|| {
    COMMAND_ENDPOINTS
        .iter()
        .map(|(command, endpoint)| (*command, endpoint))
        .collect()
});

/// Resolve a command name to its remote endpoint, if one is mapped.
pub fn lookup(command: &str) -> Option<&'static Endpoint> {
    INDEX.get(command).copied()
}
