use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};

use survey_assistant::adapters::{
    HttpAdapterConfig, HttpGenerationAdapter, InMemoryDraftStore, JsonDocumentValidator,
    MockGenerationAdapter, OfflineGenerationAdapter, StaticSurveyCatalog,
};
use survey_assistant::application::{AssistantService, GenerationPipeline};
use survey_assistant::config::{AdapterKind, AppConfig, GenerationConfig};
use survey_assistant::domain::conversation::{
    AssistantPhase, ChatRole, CustomizationIntent, PreviewDocument,
};
use survey_assistant::ports::{CatalogFilter, GenerationAdapter, PastSurveySort};

#[derive(Parser, Debug)]
#[command(
    name = "survey-assistant",
    about = "Conversational survey authoring in the terminal",
    version
)]
struct Cli {
    /// Generation backend (overrides SURVEY_ASSISTANT__GENERATION__ADAPTER)
    #[arg(short, long, value_enum)]
    adapter: Option<AdapterChoice>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AdapterChoice {
    Offline,
    Mock,
    Http,
}

impl From<AdapterChoice> for AdapterKind {
    fn from(choice: AdapterChoice) -> Self {
        match choice {
            AdapterChoice::Offline => AdapterKind::Offline,
            AdapterChoice::Mock => AdapterKind::Mock,
            AdapterChoice::Http => AdapterKind::Http,
        }
    }
}

const HELP: &str = "\
コマンド:
  :proceed            この内容でプレビューする
  :refine             チャットで補足する
  :templates [語]     テンプレート一覧
  :template <id>      テンプレートを選択
  :past               過去の調査一覧（新しい順）
  :past <id>          過去の調査を選択
  :edit               プレビューを編集する
  :suggest <n>        編集候補を選ぶ
  :confirm            確定して下書きを保存
  :quit               終了
それ以外の入力はチャットとして送信します。";

enum Command<'a> {
    Chat(&'a str),
    Proceed,
    Refine,
    Templates(Option<&'a str>),
    PastSurveys,
    Template(&'a str),
    Past(&'a str),
    Edit,
    Suggest(&'a str),
    Confirm,
    Help,
    Quit,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Chat(line);
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };
        match (name, arg) {
            ("proceed", _) => Command::Proceed,
            ("refine", _) => Command::Refine,
            ("templates", keyword) => Command::Templates(keyword),
            ("template", Some(id)) => Command::Template(id),
            ("past", Some(id)) => Command::Past(id),
            ("past", None) => Command::PastSurveys,
            ("edit", _) => Command::Edit,
            ("suggest", Some(n)) => Command::Suggest(n),
            ("confirm", _) => Command::Confirm,
            ("quit" | "q" | "exit", _) => Command::Quit,
            _ => Command::Help,
        }
    }
}

fn build_adapter(config: &GenerationConfig) -> Result<Arc<dyn GenerationAdapter>> {
    let adapter: Arc<dyn GenerationAdapter> = match config.adapter {
        AdapterKind::Offline => Arc::new(OfflineGenerationAdapter::new()),
        AdapterKind::Mock => Arc::new(MockGenerationAdapter::new()),
        AdapterKind::Http => {
            let base_url = config
                .base_url
                .clone()
                .context("generation.base_url is required for the http adapter")?;
            let mut http = HttpAdapterConfig::new(base_url).with_timeout(config.timeout());
            if let Some(key) = &config.api_key {
                http = http.with_api_key(key.expose_secret().clone());
            }
            Arc::new(HttpGenerationAdapter::new(http).context("failed to build http adapter")?)
        }
    };
    Ok(adapter)
}

async fn print_updates(
    service: &AssistantService,
    printed: &mut usize,
    shown: &mut Option<PreviewDocument>,
) {
    let view = service.view().await;
    for entry in view.entries.iter().skip(*printed) {
        match entry.role {
            ChatRole::User => println!("> {}", entry.text),
            ChatRole::Assistant => println!("assistant: {}", entry.text),
        }
    }
    *printed = view.entries.len();

    if view.phase == AssistantPhase::Previewing && view.preview != *shown {
        if let Some(preview) = &view.preview {
            println!("--- {} ({}) ---", preview.title, preview.mode.label());
            for q in &preview.questions {
                println!("{}. {} [{}]", q.id, q.text, q.format.as_str());
                if !q.options.is_empty() {
                    println!("    {}", q.options.join(" / "));
                }
            }
        }
        *shown = view.preview.clone();
    }
    for (i, intent) in view.suggestions.iter().enumerate() {
        println!("  :suggest {} {}", i + 1, intent.label());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(choice) = cli.adapter {
        config.generation.adapter = choice.into();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    config.validate().context("invalid configuration")?;
    config.logging.init_tracing();

    let adapter = build_adapter(&config.generation)?;
    let pipeline = GenerationPipeline::new(adapter, Arc::new(JsonDocumentValidator::new()))
        .with_timeout(config.generation.timeout());
    let service = AssistantService::new(
        Arc::new(pipeline),
        Arc::new(StaticSurveyCatalog::new()),
        Arc::new(InMemoryDraftStore::new()),
    );

    println!("survey-assistant ({}). :help でコマンド一覧", service.adapter_name());
    let mut printed = 0;
    let mut shown = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let result = match Command::parse(&line) {
            Command::Chat("") => continue,
            Command::Chat(text) => service.submit_user_message(text, Vec::new()).await.map(drop),
            Command::Proceed => service.accept_proceed().await.map(drop),
            Command::Refine => service.continue_refining().await,
            Command::Templates(keyword) => {
                let filter = keyword.map(CatalogFilter::keyword).unwrap_or_default();
                for t in service.list_templates(&filter) {
                    println!("  {:<24} {} ({}問)", t.id, t.title, t.questions.len());
                }
                Ok(())
            }
            Command::PastSurveys => {
                let filter = CatalogFilter::default();
                for s in service.list_past_surveys(&filter, PastSurveySort::NewestFirst) {
                    println!("  {:<8} {} [{}] {}", s.id, s.title, s.updated_on, s.response_count);
                }
                Ok(())
            }
            Command::Template(id) => service.select_template(id).await.map(drop),
            Command::Past(id) => service.select_past_survey(id).await.map(drop),
            Command::Edit => service.request_edit().await.map(drop),
            Command::Suggest(n) => match n.parse().ok().and_then(CustomizationIntent::from_menu_index) {
                Some(intent) => service.choose_suggestion(intent).await.map(drop),
                None => {
                    println!("1〜{} の番号を指定してください。", CustomizationIntent::ALL.len());
                    Ok(())
                }
            },
            Command::Confirm => service.confirm_preview().await.map(|draft| {
                match serde_json::to_string_pretty(&draft) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!(error = %e, "could not render draft"),
                }
            }),
            Command::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Command::Quit => break,
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "command rejected");
            println!("assistant: {}", e.to_client_message());
        }
        print_updates(&service, &mut printed, &mut shown).await;
    }

    Ok(())
}
