// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Civic issue tracker server binary.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use civic_server::{create_app_state, create_router, ServerConfig};
use civic_server_auth::access_token::{generate_access_token, hash_token};
use civic_server_config::LogFormat;
use civic_server_db::{TokenRepository, UserRepository};
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod version;

const TOKEN_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Civic server - HTTP API for reporting and tracking civic issues.
#[derive(Parser, Debug)]
#[command(name = "civic-server", about = "Civic issue tracker server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/civic/server.toml)
	#[arg(long, global = true, env = "CIVIC_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Show version and build information
	Version,
	/// Mint an access token for an existing user and print it once
	IssueToken {
		#[arg(long)]
		email: String,
	},
	/// Set a user's role
	GrantRole {
		#[arg(long)]
		email: String,
		#[arg(long, value_enum)]
		role: RoleArg,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
	Regular,
	Staff,
	Admin,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => civic_server_config::load_config_with_file(path)?,
		None => civic_server_config::load_config()?,
	};
	init_tracing(&config);

	let pool = civic_server_db::create_pool(&config.database.url).await?;
	civic_server_db::run_migrations(&pool).await?;

	match args.command {
		None | Some(Command::Serve) => serve(config, pool).await,
		Some(Command::IssueToken { email }) => issue_token(&config, pool, &email).await,
		Some(Command::GrantRole { email, role }) => grant_role(pool, &email, role).await,
		Some(Command::Version) => Ok(()),
	}
}

fn init_tracing(config: &ServerConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
	let registry = tracing_subscriber::registry().with(filter);

	match config.logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

async fn serve(config: ServerConfig, pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		environment = %config.auth.environment,
		"starting civic-server"
	);

	let cleanup = tokio::spawn(purge_expired_tokens(TokenRepository::new(pool.clone())));

	let state = create_app_state(pool);
	let app = create_router(state).layer(
		CorsLayer::new()
			.allow_origin(Any)
			.allow_methods(Any)
			.allow_headers(Any),
	);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	cleanup.abort();
	tracing::info!("Server shutdown complete");
	Ok(())
}

async fn purge_expired_tokens(tokens: TokenRepository) {
	let mut interval = tokio::time::interval(TOKEN_CLEANUP_INTERVAL);
	loop {
		interval.tick().await;
		match tokens.delete_expired(Utc::now()).await {
			Ok(0) => {}
			Ok(removed) => tracing::info!(removed, "expired access tokens purged"),
			Err(e) => tracing::warn!(error = %e, "failed to purge expired access tokens"),
		}
	}
}

async fn issue_token(
	config: &ServerConfig,
	pool: SqlitePool,
	email: &str,
) -> Result<(), Box<dyn std::error::Error>> {
	let users = UserRepository::new(pool.clone());
	let Some(user) = users.get_user_by_email(&email.trim().to_lowercase()).await? else {
		return Err(format!("no user with email {email}").into());
	};

	let ttl = Duration::from_secs(config.auth.token_ttl_secs);
	let expires_at = Utc::now() + chrono::Duration::from_std(ttl)?;
	let token = generate_access_token();
	let token_id = TokenRepository::new(pool)
		.create_token(&user.id, &hash_token(&token), expires_at)
		.await?;

	tracing::info!(user_id = %user.id, %token_id, "access token issued");
	println!("{token}");
	eprintln!(
		"expires in {} ({})",
		humantime::format_duration(ttl),
		expires_at.to_rfc3339()
	);
	Ok(())
}

async fn grant_role(
	pool: SqlitePool,
	email: &str,
	role: RoleArg,
) -> Result<(), Box<dyn std::error::Error>> {
	let users = UserRepository::new(pool);
	let Some(user) = users.get_user_by_email(&email.trim().to_lowercase()).await? else {
		return Err(format!("no user with email {email}").into());
	};

	let (is_staff, is_admin) = match role {
		RoleArg::Regular => (false, false),
		RoleArg::Staff => (true, false),
		RoleArg::Admin => (true, true),
	};
	users.set_roles(&user.id, is_staff, is_admin).await?;

	tracing::info!(user_id = %user.id, ?role, "role updated");
	println!("{} is now {:?}", user.email, role);
	Ok(())
}
