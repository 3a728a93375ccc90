//! Shared command setup: configuration, storage and the caller identity

use super::GlobalOpts;
use anyhow::{bail, Context, Result};
use avalia_core::ban::AccountBanService;
use avalia_core::config::Config;
use avalia_core::moderation::ModerationQueries;
use avalia_core::service::CommentService;
use avalia_core::types::{Actor, Role, UserKey};
use avalia_storage::{FileBanRegistry, FileSystemRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration file used when `--config` is not given
pub fn config_path(opts: &GlobalOpts) -> PathBuf {
    opts.config
        .clone()
        .unwrap_or_else(|| opts.data_dir.join("config.toml"))
}

/// Load the configuration, falling back to defaults when no file exists
pub fn load_config(opts: &GlobalOpts) -> Result<Config> {
    let path = config_path(opts);
    if path.exists() {
        return Config::load(&path).context(format!("Invalid configuration in {}", path.display()));
    }
    if opts.config.is_some() {
        bail!("Configuration file not found: {}", path.display());
    }
    tracing::debug!("No configuration at {}, using defaults", path.display());
    Ok(Config::default())
}

/// Opened stores plus the services built on them
pub struct Workspace {
    pub config: Config,
    pub service: CommentService,
    pub queries: ModerationQueries,
    bans: Arc<FileBanRegistry>,
    user: Option<UserKey>,
}

impl Workspace {
    pub fn open(opts: &GlobalOpts) -> Result<Self> {
        let config = load_config(opts)?;

        let repository = Arc::new(
            FileSystemRepository::open(&opts.data_dir)
                .context(format!("Failed to open comments in {}", opts.data_dir.display()))?,
        );
        let bans = Arc::new(
            FileBanRegistry::open(&opts.data_dir)
                .context(format!("Failed to open bans in {}", opts.data_dir.display()))?,
        );

        let service = CommentService::with_config(repository.clone(), bans.clone(), &config);
        let queries = ModerationQueries::new(repository, config.queries.clone());

        Ok(Self {
            config,
            service,
            queries,
            bans,
            user: opts.user.as_deref().map(UserKey::new),
        })
    }

    /// The acting user; banned accounts are turned away
    pub fn caller(&self) -> Result<UserKey> {
        let user = self.identity()?;
        if self.bans.is_banned(&user)? {
            bail!("Account {} is banned", user);
        }
        Ok(user)
    }

    /// The acting user with the role granted by `[moderation] admins`
    pub fn actor(&self) -> Result<Actor> {
        let key = self.caller()?;
        let role = if self.config.moderation.is_admin(&key) {
            Role::Admin
        } else {
            Role::User
        };
        Ok(Actor { key, role })
    }

    /// The acting user, who must be a listed admin and not banned
    pub fn admin(&self) -> Result<UserKey> {
        let actor = self.actor()?;
        if !actor.is_admin() {
            bail!(
                "Forbidden: {} is not an admin (see [moderation] admins)",
                actor.key
            );
        }
        Ok(actor.key)
    }

    /// The acting user, without the ban check
    pub fn identity(&self) -> Result<UserKey> {
        match &self.user {
            Some(user) if !user.as_str().is_empty() => Ok(user.clone()),
            _ => bail!("No user given; pass --as <USER> or set AVALIA_USER"),
        }
    }

    pub fn bans(&self) -> &FileBanRegistry {
        &self.bans
    }
}
