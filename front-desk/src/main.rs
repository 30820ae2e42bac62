use front_desk::{Config, LoyaltyState, initialize_database, setup_environment};
use loyalty_client::RestGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment()?;

    tracing::info!("Front desk starting...");

    // 2. 加载配置
    let config = Config::from_env().inspect_err(|e| tracing::error!("Configuration error: {}", e))?;
    tracing::info!(
        environment = %config.environment,
        business = %config.business.name,
        store = %config.store.base_url,
        "Configuration loaded"
    );

    // 3. 连接存储, 初始化数据库
    let gateway = RestGateway::from_config(&config.store)?;
    let outcome = initialize_database(&gateway, config.seed_demo_data).await?;
    tracing::info!(?outcome, "Database initialized");

    // 4. 加载状态并汇报
    let state = LoyaltyState::load(gateway).await?;
    let stats = state.dashboard(shared::util::now());
    tracing::info!(
        customers = stats.total_customers,
        visits = stats.total_visits,
        revenue = stats.total_revenue,
        points_awarded = stats.total_points_awarded,
        active_rewards = stats.active_rewards,
        visit_growth = stats.visit_growth_percent,
        "Dashboard summary"
    );
    for service in &stats.top_services {
        tracing::info!(service = %service.service, count = service.count, "Top service");
    }

    Ok(())
}
