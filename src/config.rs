/// Transaction fee rates applied when a calculate request does not override
/// them. Commission is charged on both legs, stamp tax on the sell leg only,
/// transfer fee per share on both legs.
#[derive(Debug, Clone, Copy)]
pub struct FeeConfig {
    pub commission_rate: f64,
    pub stamp_tax_rate: f64,
    pub transfer_fee: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            commission_rate: 0.0003,
            stamp_tax_rate: 0.001,
            transfer_fee: 0.00002,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://db/stock.db".to_string()),
        }
    }
}
