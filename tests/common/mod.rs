#![allow(dead_code)]

use axum::Router;
use tokio::net::TcpListener;
use vkdl::types::{AudioItem, AuthSession};

/// Binds a local listener and returns it with its base URL, so routes can be
/// built knowing where they are served from.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

pub fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

pub fn session(token: &str, user_id: &str) -> AuthSession {
    AuthSession {
        access_token: token.to_string(),
        expires_in: 3600,
        user_id: user_id.to_string(),
        obtained_at: chrono::Local::now(),
    }
}

pub fn item(artist: &str, title: &str, url: String) -> AudioItem {
    AudioItem {
        id: None,
        owner_id: None,
        artist: artist.to_string(),
        title: title.to_string(),
        duration: None,
        url,
    }
}
