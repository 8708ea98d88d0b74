use crate::{
    cli::{LoginArgs, spinner},
    config, error, success,
    types::{AuthSession, Credentials},
    vk::{AuthConfig, Authenticator},
};

pub async fn auth(args: LoginArgs) {
    let session = authenticate(args).await;
    success!("Logged in as user {}", session.user_id);
    success!(
        "Access token valid until {}",
        session.expires_at().format("%Y-%m-%d %H:%M:%S")
    );
}

/// Logs in with the configured credentials or exits the process.
pub(crate) async fn authenticate(args: LoginArgs) -> AuthSession {
    let login = match args.login.map(Ok).unwrap_or_else(config::vk_login) {
        Ok(login) => login,
        Err(e) => error!("No VK login given. Use --login or set VK_LOGIN. Err: {}", e),
    };
    let password = match args.password.map(Ok).unwrap_or_else(config::vk_password) {
        Ok(password) => password,
        Err(e) => error!(
            "No VK password given. Use --password or set VK_PASSWORD. Err: {}",
            e
        ),
    };

    let authenticator = match Authenticator::new(AuthConfig::from_env()) {
        Ok(a) => a,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };

    let pb = spinner("Logging in to VK...");
    let result = authenticator
        .authorize(&Credentials::new(login, password))
        .await;
    pb.finish_and_clear();

    match result {
        Ok(session) => session,
        Err(e) => error!("{}", e),
    }
}
