use super::parsing::{
    env_optional, env_or_default, normalize_prefix, parse_bool, parse_cors_origins,
    parse_environment, parse_store_backend, parse_u16, parse_u32, parse_u64,
};
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, OmrSettings, ParseSettings,
    RuntimeSettings, ServerHost, ServerPort, ServerSettings, Settings, StoreBackend,
    StoreSettings, TelemetrySettings, UploadSettings, MAX_UPLOAD_SIZE_MB_LIMIT,
};

const DEV_OMR_API_URL: &str = "http://localhost:8000";

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("EXAMFLOW_HOST", "0.0.0.0");
        let port = env_or_default("EXAMFLOW_PORT", "3000");
        let request_timeout_seconds =
            parse_u64("REQUEST_TIMEOUT_SECONDS", env_or_default("REQUEST_TIMEOUT_SECONDS", "60"))?;

        let environment = parse_environment(
            env_optional("EXAMFLOW_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config =
            env_optional("EXAMFLOW_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "ExamFlow API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let prefix = normalize_prefix(env_or_default("API_PREFIX", "/api"));

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let backend = parse_store_backend(env_optional("STORE_BACKEND"))?;

        let parse_app_id = env_or_default("BACK4APP_APP_ID", "");
        let parse_javascript_key = env_or_default("BACK4APP_JS_KEY", "");
        let parse_server_url = env_or_default("BACK4APP_SERVER_URL", "https://parseapi.back4app.com")
            .trim_end_matches('/')
            .to_string();
        let parse_timeout_seconds =
            parse_u64("BACK4APP_TIMEOUT_SECONDS", env_or_default("BACK4APP_TIMEOUT_SECONDS", "20"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "examflow");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "examflow");
        let database_url = env_optional("DATABASE_URL");

        let (omr_base_url, omr_base_url_defaulted) = match env_optional("OMR_API_URL") {
            Some(url) => (url.trim_end_matches('/').to_string(), false),
            None => (DEV_OMR_API_URL.to_string(), true),
        };
        let omr_timeout_seconds =
            parse_u64("OMR_TIMEOUT_SECONDS", env_or_default("OMR_TIMEOUT_SECONDS", "55"))?;
        let omr_synthetic_fallback =
            env_optional("OMR_SYNTHETIC_FALLBACK").map(|value| parse_bool(&value)).unwrap_or(true);
        let omr_synthetic_questions =
            parse_u32("OMR_SYNTHETIC_QUESTIONS", env_or_default("OMR_SYNTHETIC_QUESTIONS", "44"))?;

        let max_upload_size_mb =
            parse_u64("MAX_UPLOAD_SIZE_MB", env_or_default("MAX_UPLOAD_SIZE_MB", "10"))?;

        let log_level = env_or_default("EXAMFLOW_LOG_LEVEL", "info");
        let json = env_optional("EXAMFLOW_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
                request_timeout_seconds,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, prefix },
            cors: CorsSettings { origins: cors_origins },
            store: StoreSettings { backend },
            parse: ParseSettings {
                app_id: parse_app_id,
                javascript_key: parse_javascript_key,
                server_url: parse_server_url,
                timeout_seconds: parse_timeout_seconds,
            },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            omr: OmrSettings {
                base_url: omr_base_url,
                base_url_defaulted: omr_base_url_defaulted,
                timeout_seconds: omr_timeout_seconds,
                synthetic_fallback: omr_synthetic_fallback,
                synthetic_questions: omr_synthetic_questions,
            },
            upload: UploadSettings { max_upload_size_mb },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn store(&self) -> &StoreSettings {
        &self.store
    }

    pub(crate) fn parse(&self) -> &ParseSettings {
        &self.parse
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn omr(&self) -> &OmrSettings {
        &self.omr
    }

    pub(crate) fn upload(&self) -> &UploadSettings {
        &self.upload
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "REQUEST_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        // The OMR call must finish early enough to still answer within the request budget.
        if self.omr.timeout_seconds == 0
            || self.omr.timeout_seconds >= self.server.request_timeout_seconds
        {
            return Err(ConfigError::InvalidValue {
                field: "OMR_TIMEOUT_SECONDS",
                value: self.omr.timeout_seconds.to_string(),
            });
        }

        if self.omr.synthetic_questions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "OMR_SYNTHETIC_QUESTIONS",
                value: "0".to_string(),
            });
        }

        if !self.omr.base_url.starts_with("http://") && !self.omr.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "OMR_API_URL",
                value: self.omr.base_url.clone(),
            });
        }

        if self.upload.max_upload_size_mb == 0
            || self.upload.max_upload_size_mb > MAX_UPLOAD_SIZE_MB_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "MAX_UPLOAD_SIZE_MB",
                value: self.upload.max_upload_size_mb.to_string(),
            });
        }

        if self.store.backend == StoreBackend::Parse {
            if self.parse.app_id.is_empty() {
                return Err(ConfigError::MissingSecret("BACK4APP_APP_ID"));
            }
            if self.parse.javascript_key.is_empty() {
                return Err(ConfigError::MissingSecret("BACK4APP_JS_KEY"));
            }
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.omr.base_url_defaulted {
            return Err(ConfigError::MissingValue("OMR_API_URL"));
        }
        if self.store.backend == StoreBackend::Memory {
            return Err(ConfigError::InvalidValue {
                field: "STORE_BACKEND",
                value: StoreBackend::Memory.as_str().to_string(),
            });
        }
        if self.store.backend == StoreBackend::Postgres
            && self.database.database_url.is_none()
            && self.database.postgres_password.is_empty()
        {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}
