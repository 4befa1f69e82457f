//! MCP server exposing the weather tools over stdio.

use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::tools::{DEFAULT_UNITS, WeatherTools};

fn default_units() -> String {
    DEFAULT_UNITS.to_string()
}

fn default_days() -> u32 {
    1
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherArgs {
    /// The city name to get weather for
    pub city: String,
    /// Optional: Country code (e.g., 'US', 'UK')
    #[serde(default)]
    pub country_code: Option<String>,
    /// Optional: Units for temperature ('metric', 'imperial' or 'standard')
    #[serde(default = "default_units")]
    pub units: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastArgs {
    /// The city name to get forecast for
    pub city: String,
    /// Optional: Country code (e.g., 'US', 'UK')
    #[serde(default)]
    pub country_code: Option<String>,
    /// Optional: Units for temperature ('metric', 'imperial' or 'standard')
    #[serde(default = "default_units")]
    pub units: String,
    /// Optional: Number of days to forecast (default is 1, max is 5)
    #[serde(default = "default_days")]
    pub days: u32,
}

/// Tool handler; every outcome, including failures, is returned as text.
#[derive(Clone)]
pub struct WeatherServer {
    tools: WeatherTools,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new(tools: WeatherTools) -> Self {
        Self { tools, tool_router: Self::tool_router() }
    }

    #[tool(description = "Gets current weather conditions for the specified city.")]
    async fn get_current_weather(
        &self,
        Parameters(args): Parameters<CurrentWeatherArgs>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .tools
            .current_weather(&args.city, args.country_code.as_deref(), &args.units)
            .await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Gets weather forecast for the specified city.")]
    async fn get_forecast(
        &self,
        Parameters(args): Parameters<ForecastArgs>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .tools
            .forecast(&args.city, args.country_code.as_deref(), &args.units, args.days)
            .await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.instructions =
            Some("Current weather and multi-day forecasts for a named city.".to_string());
        info
    }
}

/// Serve on stdin/stdout until the client disconnects. Logs stay on stderr.
pub async fn serve_stdio(tools: WeatherTools) -> anyhow::Result<()> {
    tracing::info!("starting weather MCP server on stdio");

    let service = WeatherServer::new(tools).serve(rmcp::transport::stdio()).await?;
    let reason = service.waiting().await?;

    tracing::info!(?reason, "weather MCP server stopped");
    Ok(())
}
