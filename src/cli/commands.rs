//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use super::prompt::{self, PromptCredentials};
use crate::api::{ApiClient, Page};
use crate::auth::{CredentialProvider, NewAdmin, NoCredentials, SessionManager, StaticCredentials};
use crate::cli::{
    confirm, error, info, print_admin, print_countdown, print_dashboard, print_distribution,
    print_live_stats, print_participants, print_structured, print_tokenomics, print_transactions,
    render_structured, spinner, success, warn, AdminsAction, CountdownAction, LiveStatsAction,
    NewsletterAction, OutputFormat, PageArgs, ParticipantsAction, PresaleAction, TokenomicsAction,
    TransactionsAction,
};
use crate::config::{self, loader::CONFIG_FILENAME, Config, RefreshConfig};
use crate::error::Error;
use crate::presale::countdown::normalize_target_date;
use crate::presale::PresaleSettings;
use crate::retry;
use crate::storage::FileStore;

/// Everything a command needs: configuration, backend client and session
pub struct Context {
    pub config: Config,
    pub api: ApiClient,
    pub session: SessionManager,
}

impl Context {
    /// Load configuration and restore the stored session
    pub fn load(url: Option<String>) -> Result<Self> {
        let mut config = config::load_or_default()?;
        if let Some(url) = url {
            config.api.base_url = url;
        }

        let api = ApiClient::new(&config.api)?;
        let session = SessionManager::load(
            Arc::new(FileStore::new(&config.session.file)),
            Arc::new(api.clone()),
            credential_provider(&config.refresh),
        );

        tracing::debug!(
            "Using backend {} with session file {}",
            api.base_url(),
            config.session.file.display()
        );

        Ok(Self {
            config,
            api,
            session,
        })
    }

    /// Run an authenticated call with refresh-on-401
    async fn call<T, F, Fut>(&self, action: &str, call: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = crate::error::Result<T>>,
    {
        retry::with_session(&self.session, call)
            .await
            .map_err(|e| report(action, e))
    }
}

fn credential_provider(refresh: &RefreshConfig) -> Arc<dyn CredentialProvider> {
    if let Some(credentials) = StaticCredentials::from_config(refresh) {
        return Arc::new(credentials);
    }
    if refresh.prompt && std::io::stdin().is_terminal() {
        return Arc::new(PromptCredentials);
    }
    Arc::new(NoCredentials)
}

/// Print a failure the way the operator needs to see it
fn report(action: &str, err: Error) -> anyhow::Error {
    match &err {
        Error::NotAuthenticated => warn(&err.to_string()),
        Error::SessionExpired => {
            warn(&err.to_string());
            info("Run 'presale-admin login' to sign in again");
        }
        Error::Validation(message) => error(message),
        _ => error(&format!("Failed to {}: {}", action, err)),
    }
    err.into()
}

/// Create a presale-admin.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set the backend URL and run 'presale-admin login'");

    Ok(())
}

/// Log in and store the session
pub async fn login(ctx: &Context, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = prompt::email(email)?;
    let password = prompt::password(password)?;

    let pb = spinner("Signing in...");
    let result = ctx.session.authenticate(&email, &password).await;
    pb.finish_and_clear();

    match result {
        Ok(user) => {
            success(&format!("Welcome back, {}!", user.name));
            Ok(())
        }
        Err(e) => Err(report("log in", e)),
    }
}

/// Clear the stored session
pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.session.logout().await.map_err(|e| report("log out", e))?;
    success("You have been logged out");
    Ok(())
}

/// Show the logged in operator
pub async fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.user().await {
        Some(user) => print_admin(&user),
        None => warn("Not logged in"),
    }
    Ok(())
}

/// Show dashboard totals
pub async fn dashboard(ctx: &Context, format: OutputFormat) -> Result<()> {
    let api = &ctx.api;
    let stats = ctx
        .call("fetch dashboard statistics", move |t| async move {
            api.dashboard_stats(&t).await
        })
        .await?;

    match format {
        OutputFormat::Table => print_dashboard(&stats),
        _ => print_structured(&stats, format)?,
    }
    Ok(())
}

/// Countdown timer commands
pub async fn countdown(ctx: &Context, action: CountdownAction) -> Result<()> {
    let api = &ctx.api;
    let load = move |t: String| async move { api.countdown(&t).await };

    match action {
        CountdownAction::Show { format } => {
            let settings = ctx.call("load countdown settings", load).await?;
            match format {
                OutputFormat::Table => print_countdown(&settings),
                _ => print_structured(&settings, format)?,
            }
        }
        CountdownAction::Set {
            target,
            preset,
            title,
            description,
            active,
        } => {
            let mut settings = ctx.call("load countdown settings", load).await?;

            if let Some(target) = target {
                settings.target_date =
                    normalize_target_date(&target).map_err(|e| report("update countdown", e))?;
            } else if let Some(preset) = preset {
                settings.target_date = preset.target();
            }
            if let Some(title) = title {
                settings.title = title;
            }
            if let Some(description) = description {
                settings.description = description;
            }
            if let Some(active) = active {
                settings.is_active = active;
            }
            settings.updated_at = None;
            settings
                .validate()
                .map_err(|e| report("update countdown", e))?;

            let settings = &settings;
            ctx.call("update countdown settings", move |t| async move {
                api.update_countdown(&t, settings).await
            })
            .await?;
            success("Countdown settings updated");

            let saved = ctx.call("load countdown settings", load).await?;
            print_countdown(&saved);
        }
    }
    Ok(())
}

/// Live statistics commands
pub async fn live_stats(ctx: &Context, action: LiveStatsAction) -> Result<()> {
    let api = &ctx.api;
    let load = move |t: String| async move { api.live_stats(&t).await };

    match action {
        LiveStatsAction::Show { format } => {
            let stats = ctx.call("load live stats", load).await?;
            match format {
                OutputFormat::Table => print_live_stats(&stats),
                _ => print_structured(&stats, format)?,
            }
        }
        LiveStatsAction::Set {
            participants,
            raised,
            tokens_allocated,
            days_to_launch,
            active,
        } => {
            let mut stats = ctx.call("load live stats", load).await?;

            if let Some(participants) = participants {
                stats.participants = participants;
            }
            if let Some(raised) = raised {
                stats.raised_amount = raised;
            }
            if let Some(tokens_allocated) = tokens_allocated {
                stats.tokens_allocated = tokens_allocated;
            }
            if let Some(days) = days_to_launch {
                stats.days_to_launch = days;
            }
            if let Some(active) = active {
                stats.is_active = active;
            }
            stats.updated_at = None;
            stats.validate().map_err(|e| report("update live stats", e))?;

            let stats = &stats;
            ctx.call("update live stats", move |t| async move {
                api.update_live_stats(&t, stats).await
            })
            .await?;
            success("Live stats updated");

            let saved = ctx.call("load live stats", load).await?;
            print_live_stats(&saved);
        }
    }
    Ok(())
}

/// Tokenomics commands
pub async fn tokenomics(ctx: &Context, action: TokenomicsAction) -> Result<()> {
    let api = &ctx.api;
    let load = move |t: String| async move { api.tokenomics(&t).await };

    match action {
        TokenomicsAction::Show { format } => {
            let tokenomics = ctx.call("load tokenomics", load).await?;
            match format {
                OutputFormat::Table => print_tokenomics(&tokenomics),
                _ => print_structured(&tokenomics, format)?,
            }
        }
        TokenomicsAction::Set {
            total_supply,
            stages,
            public_price,
            active,
        } => {
            let mut tokenomics = ctx.call("load tokenomics", load).await?;

            if let Some(total_supply) = total_supply {
                tokenomics.total_supply = total_supply;
            }
            for (stage, price) in stages {
                tokenomics
                    .set_stage_price(stage, price)
                    .map_err(|e| report("update tokenomics", e))?;
            }
            if let Some(price) = public_price {
                tokenomics.public_sale_price = price;
            }
            if let Some(active) = active {
                tokenomics.is_active = active;
            }
            tokenomics.updated_at = None;
            tokenomics
                .validate()
                .map_err(|e| report("update tokenomics", e))?;

            let tokenomics = &tokenomics;
            ctx.call("update tokenomics", move |t| async move {
                api.update_tokenomics(&t, tokenomics).await
            })
            .await?;
            success("Tokenomics updated");

            let saved = ctx.call("load tokenomics", load).await?;
            print_tokenomics(&saved);
        }
        TokenomicsAction::Preview { total_supply } => {
            if total_supply == 0 {
                return Err(report(
                    "preview distribution",
                    Error::Validation("Total supply must be greater than 0".to_string()),
                ));
            }
            print_distribution(total_supply);
        }
    }
    Ok(())
}

/// Presale stage and status commands
pub async fn presale(ctx: &Context, action: PresaleAction) -> Result<()> {
    let api = &ctx.api;

    match action {
        PresaleAction::Status => {
            let pb = spinner("Fetching presale status...");
            let status = api.presale_status().await;
            pb.finish_and_clear();
            let status = status.map_err(|e| report("fetch presale status", e))?;
            print_structured(&status, OutputFormat::Json)?;
        }
        PresaleAction::Stage { stage } => {
            ctx.call("update presale stage", move |t| async move {
                api.update_presale_stage(&t, stage).await
            })
            .await?;
            success(&format!("Presale moved to stage {}", stage));
        }
        PresaleAction::Price { stage, price } => {
            ctx.call("update stage price", move |t| async move {
                api.update_presale_price(&t, stage, price).await
            })
            .await?;
            success(&format!("Stage {} price set to ${}", stage, price));
        }
        PresaleAction::Settings {
            min_purchase,
            max_purchase,
            hard_cap,
            start_date,
            end_date,
        } => {
            let settings = PresaleSettings {
                min_purchase,
                max_purchase,
                hard_cap,
                start_date,
                end_date,
            };
            let update = &settings;
            ctx.call("update presale settings", move |t| async move {
                api.update_presale_settings(&t, update).await
            })
            .await?;
            success("Presale settings updated");
        }
        PresaleAction::Open => {
            ctx.call("open presale", move |t| async move {
                api.toggle_presale(&t, true).await
            })
            .await?;
            success("Presale opened");
        }
        PresaleAction::Close { force } => {
            if !force && !confirm("Close the presale? Buyers will no longer be able to purchase.") {
                info("Cancelled");
                return Ok(());
            }
            ctx.call("close presale", move |t| async move {
                api.toggle_presale(&t, false).await
            })
            .await?;
            success("Presale closed");
        }
    }
    Ok(())
}

/// Participant commands
pub async fn participants(ctx: &Context, action: ParticipantsAction) -> Result<()> {
    let api = &ctx.api;

    match action {
        ParticipantsAction::List { paging, format } => {
            let PageArgs { page, limit } = paging;
            let page = ctx
                .call("load participants", move |t| async move {
                    api.participants(&t, page, limit).await
                })
                .await?;
            match format {
                OutputFormat::Table => print_participants(&page),
                _ => print_structured(&page, format)?,
            }
        }
        ParticipantsAction::Search { query, format } => {
            let query = query.as_str();
            let found = ctx
                .call("search participants", move |t| async move {
                    api.search_participants(&t, query).await
                })
                .await?;
            match format {
                OutputFormat::Table => {
                    let limit = found.len().max(1) as u32;
                    print_participants(&Page::new(found, None, 1, limit));
                }
                _ => print_structured(&found, format)?,
            }
        }
        ParticipantsAction::Show { wallet } => {
            let wallet = wallet.as_str();
            let details = ctx
                .call("load participant", move |t| async move {
                    api.participant(&t, wallet).await
                })
                .await?;
            print_structured(&details, OutputFormat::Json)?;
        }
    }
    Ok(())
}

/// Transaction log commands
pub async fn transactions(ctx: &Context, action: TransactionsAction) -> Result<()> {
    let api = &ctx.api;

    match action {
        TransactionsAction::List { paging, format } => {
            let PageArgs { page, limit } = paging;
            let page = ctx
                .call("load transactions", move |t| async move {
                    api.transactions(&t, page, limit).await
                })
                .await?;
            match format {
                OutputFormat::Table => print_transactions(&page),
                _ => print_structured(&page, format)?,
            }
        }
        TransactionsAction::Search { query } => {
            let query = query.as_str();
            let found = ctx
                .call("search transactions", move |t| async move {
                    api.search_transactions(&t, query).await
                })
                .await?;
            print_structured(&found, OutputFormat::Json)?;
        }
        TransactionsAction::Show { hash } => {
            let hash = hash.as_str();
            let details = ctx
                .call("load transaction", move |t| async move {
                    api.transaction(&t, hash).await
                })
                .await?;
            print_structured(&details, OutputFormat::Json)?;
        }
    }
    Ok(())
}

/// Analytics overview
pub async fn analytics(
    ctx: &Context,
    from: Option<String>,
    to: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let api = &ctx.api;
    let (from, to) = (from.as_deref(), to.as_deref());
    let overview = ctx
        .call("load analytics", move |t| async move {
            api.analytics(&t, from, to).await
        })
        .await?;
    print_structured(&overview, format)
}

/// Newsletter subscribers
pub async fn newsletter(ctx: &Context, action: NewsletterAction) -> Result<()> {
    let api = &ctx.api;

    match action {
        NewsletterAction::List { paging, format } => {
            let PageArgs { page, limit } = paging;
            let subscribers = ctx
                .call("load newsletter subscribers", move |t| async move {
                    api.newsletter_subscribers(&t, page, limit).await
                })
                .await?;
            print_structured(&subscribers, format)?;
        }
        NewsletterAction::Export { output, format } => {
            let export = ctx
                .call("export newsletter subscribers", move |t| async move {
                    api.export_newsletter_subscribers(&t).await
                })
                .await?;
            match output {
                Some(path) => {
                    fs::write(&path, render_structured(&export, format)?)
                        .map_err(|e| report("write export", Error::Io(e)))?;
                    success(&format!("Exported subscribers to {}", path.display()));
                }
                None => print_structured(&export, format)?,
            }
        }
    }
    Ok(())
}

/// Operator account commands
pub async fn admins(ctx: &Context, action: AdminsAction) -> Result<()> {
    let api = &ctx.api;

    match action {
        AdminsAction::List => {
            let admins = ctx
                .call("list admins", move |t| async move { api.list_admins(&t).await })
                .await?;
            print_structured(&admins, OutputFormat::Json)?;
        }
        AdminsAction::Create {
            name,
            email,
            role,
            permissions,
        } => {
            let password = prompt::password(None)?;
            let admin = NewAdmin {
                name,
                email,
                password,
                role,
                permissions,
            };
            let new_admin = &admin;
            ctx.call("create admin", move |t| async move {
                api.create_admin(&t, new_admin).await
            })
            .await?;
            success(&format!("Created operator {}", admin.email));
        }
    }
    Ok(())
}
