use anyhow::{anyhow, Result};

/// Validate username (alphanumeric and hyphens, 1-39 chars for GitHub compatibility)
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > 39 {
        return Err(anyhow!("Username must be between 1 and 39 characters"));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(anyhow!(
            "Username can only contain alphanumeric characters and hyphens"
        ));
    }

    Ok(())
}

/// Validate a repository name in `owner/repo` form
pub fn validate_repo_full_name(full_name: &str) -> Result<()> {
    let (owner, repo) = full_name
        .split_once('/')
        .ok_or_else(|| anyhow!("Repository must be in owner/repo format, got: {}", full_name))?;

    validate_username(owner)?;

    if repo.is_empty() || repo.len() > 100 {
        return Err(anyhow!("Repository name must be between 1 and 100 characters"));
    }

    if repo == "." || repo == ".." {
        return Err(anyhow!("Repository name cannot be a relative path segment"));
    }

    if !repo
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(anyhow!(
            "Repository name can only contain alphanumeric characters, hyphens, underscores, and dots"
        ));
    }

    Ok(())
}
