//! Module for setting up a [`scholar`] environment

use super::*;

#[derive(Args, Clone)]
pub struct InitArgs {
  /// Where to create the article store
  #[arg(long)]
  pub db_path:   Option<PathBuf>,
  /// SerpApi key, stored in the configuration file
  #[arg(long)]
  pub api_key:   Option<String>,
  /// How storage connections are admitted
  #[arg(long, value_enum)]
  pub policy:    Option<PolicyArg>,
  /// Connections kept by the pooled policy
  #[arg(long)]
  pub pool_size: Option<usize>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init<I: UserInteraction>(
  interaction: &I,
  config_path: PathBuf,
  args: InitArgs,
) -> Result<()> {
  let InitArgs { db_path, api_key, policy, pool_size } = args;

  if config_path.exists()
    && !interaction.confirm(&format!(
      "A configuration already exists at {:?}, do you want to overwrite it?",
      config_path
    ))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration. Pass --config to write one elsewhere",
    ))?;
    return Ok(());
  }

  let config = if let Some(db_path) = db_path {
    Config::default().with_database_path(db_path)
  } else if !interaction.confirm(&format!(
    "Would you like to use the default path {:?} for the article store?",
    Database::default_path(),
  ))? {
    interaction.reply(ResponseContent::Info(
      "Please pass in your intended article store path using --db-path",
    ))?;
    return Ok(());
  } else {
    Config::default()
  };

  let defaults = config.admission.clone();
  let config = config.with_admission(
    policy.map_or(defaults.policy, AdmissionPolicy::from),
    pool_size.unwrap_or(defaults.pool_size),
  );

  let api_key = match api_key {
    Some(key) => Some(key),
    None if config.resolve_api_key().is_some() => None,
    None => {
      let key = interaction.prompt("SerpApi key (leave empty to use the SERP_API_KEY variable)")?;
      (!key.trim().is_empty()).then(|| key.trim().to_string())
    },
  };
  let config = match api_key {
    Some(key) => config.with_api_key(key),
    None => config,
  };
  config.validate()?;

  if config.resolve_api_key().is_none() {
    interaction.reply(ResponseContent::Warning(
      "No API key configured yet. Searching needs one, either here or in SERP_API_KEY",
    ))?;
  }

  config.save(&config_path)?;
  Database::from_config(&config).await?;

  interaction.reply(ResponseContent::Success(&format!(
    "Created scholar configuration with\nConfig path: {:?}\nDatabase path: {:?}",
    config_path, config.database_path,
  )))?;
  Ok(())
}
