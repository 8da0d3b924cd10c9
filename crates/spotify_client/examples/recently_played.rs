use spotify_client::{
    RECENTLY_PLAYED_LIMIT, SpotifyClient, config::Config, http_client::ReqwestSpotifyClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET and SPOTIFY_REFRESH_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestSpotifyClient::new(&cfg)?;
    let token = client.refresh_access_token().await?;
    let batch = client
        .get_recently_played(&token, RECENTLY_PLAYED_LIMIT)
        .await?;
    println!("Recently played: {} items", batch.item_count());
    Ok(())
}
