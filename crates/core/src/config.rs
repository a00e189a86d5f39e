use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub api_bind: String,
    pub algobell_env: String,
    /// Bearer key required by the internal scan/send endpoints.
    pub service_key: String,
    pub fcm_server_key: String,
    pub fcm_url: String,
    pub codeforces_url: String,
    pub contest_hive_url: String,
    pub scan_interval_secs: u64,
    pub contest_cache_ttl_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let database_url =
            std::env::var("DATABASE_URL").or_else(|_| std::env::var("ALGOBELL_DATABASE_URL"))?;
        let api_bind =
            std::env::var("ALGOBELL_API_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let algobell_env = std::env::var("ALGOBELL_ENV").unwrap_or_else(|_| "dev".to_string());
        let service_key =
            std::env::var("ALGOBELL_SERVICE_KEY").or_else(|_| std::env::var("SERVICE_KEY"))?;
        let fcm_server_key = std::env::var("ALGOBELL_FCM_SERVER_KEY")
            .or_else(|_| std::env::var("FIREBASE_SERVER_KEY"))?;
        let fcm_url = std::env::var("ALGOBELL_FCM_URL")
            .unwrap_or_else(|_| "https://fcm.googleapis.com/fcm/send".to_string());
        let codeforces_url = std::env::var("ALGOBELL_CODEFORCES_URL")
            .unwrap_or_else(|_| "https://codeforces.com".to_string());
        let contest_hive_url = std::env::var("ALGOBELL_CONTEST_HIVE_URL")
            .unwrap_or_else(|_| "https://contest-hive.vercel.app".to_string());
        let scan_interval_secs = std::env::var("ALGOBELL_SCAN_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        let contest_cache_ttl_secs = std::env::var("ALGOBELL_CONTEST_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        Ok(Self {
            database_url,
            api_bind,
            algobell_env,
            service_key,
            fcm_server_key,
            fcm_url,
            codeforces_url,
            contest_hive_url,
            scan_interval_secs,
            contest_cache_ttl_secs,
        })
    }
}
