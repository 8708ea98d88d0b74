use tabled::Table;

use crate::{
    cli::{LoginArgs, auth::authenticate, spinner},
    error, info,
    types::{AudioQuery, AudioTableRow},
    vk::ApiClient,
};

pub async fn list(args: LoginArgs, query: AudioQuery) {
    let session = authenticate(args).await;
    let client = match ApiClient::new(session) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching audio list...");
    let result = client.audio().get(&query).await;
    pb.finish_and_clear();

    let audio = match result {
        Ok(audio) => audio,
        Err(e) => error!("Failed to fetch audio list: {}", e),
    };

    if audio.items.is_empty() {
        info!("No tracks found.");
        return;
    }

    let rows: Vec<AudioTableRow> = audio
        .items
        .into_iter()
        .map(|item| AudioTableRow {
            artist: item.artist,
            title: item.title,
            duration: item
                .duration
                .map(|d| format!("{}:{:02}", d / 60, d % 60))
                .unwrap_or_default(),
        })
        .collect();

    let shown = rows.len();
    println!("{}", Table::new(rows));
    info!("{} of {} tracks", shown, audio.count);
}
