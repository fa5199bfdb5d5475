use super::context::AppContext;
use super::ui::{new_table, Spinner};
use crate::output::Output;
use cinelist_api::AccountDirectory;
use cinelist_models::AccountDetails;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell};
use serde_json::json;
use tracing::warn;

const GRAVATAR_URL: &str = "https://secure.gravatar.com/avatar";
const GUEST_NAME: &str = "Guest User";

pub async fn run_account(account_id: Option<u64>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let account_id = account_id.or(ctx.config.account_id).ok_or_else(|| {
        eyre!(
            "No account id given. Pass --id or set account_id in {}",
            ctx.paths.config_file().display()
        )
    })?;

    let spinner = Spinner::start(format!("Loading account {}...", account_id));
    let account = fetch_account(&ctx, account_id).await;
    spinner.finish();

    let Some(account) = account else {
        output.no_data(&format!("account {}", account_id));
        return Ok(());
    };

    let avatar = avatar_url(&ctx, &account);
    if !output.is_human() {
        output.json(&json!({ "account": account, "avatarUrl": avatar }));
        return Ok(());
    }

    let mut table = new_table(&[account.display_name(), ""]);
    let rows = [
        ("ID", account.id.to_string()),
        ("Username", account.username.clone()),
        ("Language", account.iso_639_1.clone()),
        ("Country", account.iso_3166_1.clone()),
        ("Adult content", if account.include_adult { "shown" } else { "hidden" }.to_string()),
        ("Avatar", avatar.unwrap_or_default()),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
        }
    }
    output.table(&table);
    Ok(())
}

pub async fn fetch_account(ctx: &AppContext, account_id: u64) -> Option<AccountDetails> {
    ctx.services
        .account
        .account_details(account_id)
        .await
        .inspect_err(|e| warn!(account_id, "Failed to load account: {}", e))
        .ok()
}

/// Uploaded avatar when there is one, else the gravatar for the account's hash.
pub fn avatar_url(ctx: &AppContext, account: &AccountDetails) -> Option<String> {
    if let Some(path) = account.avatar_path().filter(|p| !p.is_empty()) {
        return Some(ctx.image_url(path));
    }
    gravatar_url(account)
}

fn gravatar_url(account: &AccountDetails) -> Option<String> {
    account
        .avatar
        .gravatar
        .hash
        .as_deref()
        .filter(|h| !h.is_empty())
        .map(|hash| format!("{}/{}", GRAVATAR_URL, hash))
}

pub fn greeting_name(account: Option<&AccountDetails>) -> &str {
    account
        .map(|a| a.username.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(GUEST_NAME)
}
