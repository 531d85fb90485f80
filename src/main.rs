use anyhow::Result;
use case_search_submit::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    case_search_submit::utils::logging::init(&config);

    // 初始化并运行应用
    let _app = App::initialize(config)?.run().await?;

    Ok(())
}
