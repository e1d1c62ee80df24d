use di_core::config::models::AppConfig;
use di_core::service::AnalysisService;

pub async fn handle(config: &AppConfig, bind: Option<String>) -> color_eyre::Result<()> {
    let mut server = config.global.server.clone();
    if let Some(bind) = bind {
        server.bind = bind;
    }

    let service = AnalysisService::from_config(config).await?;
    di_server::serve(service, &server)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e))
}
