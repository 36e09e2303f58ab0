use anyhow::{Context, Result};

use reedline::{
    DefaultCompleter, DefaultHinter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal,
};

use crate::api::HttpBackend;
use crate::config::Config;
use crate::session::{ChatController, SendOutcome, SessionState, SpawnOutcome};
use crate::types::AgentDraft;
use crate::view;

const INPUT_MIN_ROWS: usize = 1;
const INPUT_MAX_ROWS: usize = 6;
/// 对话框中输入该值表示清空字段
const CLEAR_FIELD: &str = "-";

/// 打印帮助信息
fn print_help() {
    println!("🤖 fred - OpenFred 聊天客户端");
    println!();
    println!("用法：fred <命令>");
    println!();
    println!("命令:");
    println!("  chat [agent]               进入交互模式（默认）");
    println!("  agents                     列出所有 agent");
    println!("  history <agent>            查看 agent 的对话历史");
    println!("  spawn <名> [人设] [上级]   新建 agent");
    println!("  onboard                    初始化配置");
    println!("  help                       显示此帮助信息");
    println!();
    print_repl_help();
}

fn print_repl_help() {
    println!("交互模式命令:");
    println!("  /agents          - 刷新 agent 列表");
    println!("  /switch <名>     - 切换 agent 并加载历史");
    println!("  /spawn           - 新建 agent");
    println!("  /settings        - 修改模型和 API key");
    println!("  /sidebar         - 显示/隐藏 agent 列表");
    println!("  /clear           - 清屏并重新显示对话");
    println!("  /quit            - 退出");
    println!();
}

fn term_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(80)
}

fn load_controller(config: &Config) -> Result<ChatController<HttpBackend>> {
    let backend = HttpBackend::new(&config.server)
        .with_context(|| format!("无法连接到 {}", config.server.base_url))?;
    Ok(ChatController::new(backend, SessionState::from_config(config)))
}

/// Onboard 命令 - 写入默认配置
fn run_onboard() -> Result<()> {
    println!("🚀 初始化 fred 配置...\n");

    let config = Config::default();
    let path = Config::default_path();

    config.save(&path).context("保存配置文件失败")?;
    println!("✅ 保存配置：{}", path.display());
    println!("   服务地址：{}", config.server.base_url);
    println!("   默认模型：{}", config.settings.model);
    println!();
    println!("运行 'fred chat' 开始对话");

    Ok(())
}

/// Agents 命令 - 列出 agent
async fn run_agents(config: Config) -> Result<()> {
    let mut controller = load_controller(&config)?;
    controller
        .refresh_agents()
        .await
        .context("获取 agent 列表失败")?;

    println!("📋 Agent 列表:");
    for name in &controller.state().agents {
        println!("  {}", name);
    }
    Ok(())
}

/// History 命令 - 打印对话历史
async fn run_history(config: Config, name: &str) -> Result<()> {
    let mut controller = load_controller(&config)?;
    controller
        .load_history(name)
        .await
        .with_context(|| format!("加载 {} 的历史失败", name))?;

    println!("{}", view::render_transcript(controller.state(), term_width()));
    Ok(())
}

/// Spawn 命令 - 非交互地新建 agent
async fn run_spawn(config: Config, args: &[String]) -> Result<()> {
    let Some(name) = args.first() else {
        eprintln!("❌ 请指定 agent 名称");
        eprintln!("用法：fred spawn <名> [人设] [上级]");
        std::process::exit(1);
    };

    let mut controller = load_controller(&config)?;
    let boss = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| controller.state().default_boss().to_string());
    controller.state_mut().draft = AgentDraft {
        name: name.clone(),
        soul: args.get(1).cloned().unwrap_or_default(),
        boss,
    };

    match controller.spawn_agent().await {
        SpawnOutcome::Spawned(name) => {
            println!("✅ 已创建 agent：{}", name);
            Ok(())
        }
        SpawnOutcome::Skipped => {
            eprintln!("❌ agent 名称不能为空");
            std::process::exit(1);
        }
        SpawnOutcome::Failed(e) => Err(anyhow::Error::new(e).context("创建 agent 失败")),
    }
}

/// 斜杠命令后的整段参数，保留中间空格（agent 名可以含空格）
fn command_argument(input: &str) -> Option<&str> {
    let (_, rest) = input.trim().split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// 把剩余的命令行参数拼回一个 agent 名
fn joined_args(args: &[String]) -> Option<String> {
    let name = args.join(" ");
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// 对话框字段的新值：空输入保留原值，`-` 清空
fn resolve_field(input: &str, current: &str) -> String {
    match input.trim() {
        "" => current.to_string(),
        CLEAR_FIELD => String::new(),
        value => value.to_string(),
    }
}

/// 在对话框里询问一个字段，Ctrl-C / Ctrl-D 表示取消
fn ask(editor: &mut Reedline, label: &str, current: &str) -> Result<Option<String>> {
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("{} [{}]", label, current)),
        DefaultPromptSegment::Empty,
    );
    match editor.read_line(&prompt)? {
        Signal::Success(buffer) => Ok(Some(resolve_field(&buffer, current))),
        _ => Ok(None),
    }
}

/// /spawn 对话框
async fn spawn_dialog(
    controller: &mut ChatController<HttpBackend>,
    editor: &mut Reedline,
) -> Result<()> {
    controller.open_spawn_dialog();
    println!("🧬 新建 agent（回车保留当前值，输入 - 清空，Ctrl-C 取消）");

    loop {
        let draft = controller.state().draft.clone();
        let fields = (
            ask(editor, "名称", &draft.name)?,
            ask(editor, "人设", &draft.soul)?,
            ask(editor, "上级", &draft.boss)?,
        );
        let (Some(name), Some(soul), Some(boss)) = fields else {
            controller.close_spawn_dialog();
            println!("已取消\n");
            return Ok(());
        };

        let width = term_width().min(60);
        println!("{}", view::render_input_box(&soul, width, INPUT_MIN_ROWS, INPUT_MAX_ROWS));
        controller.state_mut().draft = AgentDraft { name, soul, boss };

        match controller.spawn_agent().await {
            SpawnOutcome::Spawned(name) => {
                println!("✅ 已创建 agent：{}\n", name);
                return Ok(());
            }
            SpawnOutcome::Skipped => println!("❌ 名称不能为空"),
            SpawnOutcome::Failed(e) => println!("❌ 创建失败：{}（修改后重试，或 Ctrl-C 取消）", e),
        }
    }
}

/// /settings 对话框
fn settings_dialog(
    controller: &mut ChatController<HttpBackend>,
    editor: &mut Reedline,
) -> Result<()> {
    controller.open_settings();
    let settings = controller.state().settings.clone();

    if let Some(model) = ask(editor, "模型", &settings.model)? {
        controller.set_model(model);
        let masked = if settings.api_key.is_empty() { "" } else { "******" };
        if let Some(key) = ask(editor, "API key", masked)? {
            if key != masked {
                controller.set_api_key(key);
            }
        }
    }

    controller.close_settings();
    println!("{}\n", view::status_line(controller.state()));
    Ok(())
}

fn print_screen(controller: &ChatController<HttpBackend>) {
    let state = controller.state();
    if state.sidebar_open {
        println!("{}", view::render_sidebar(state));
        println!();
    }
    println!("{}", view::render_transcript(state, term_width()));
    println!();
    println!("{}", view::status_line(state));
}

/// Chat 命令 - 交互式对话
async fn run_chat(config: Config, agent: Option<String>) -> Result<()> {
    println!("🤖 fred - OpenFred 聊天客户端");
    println!("📡 服务：{}", config.server.base_url);
    println!("输入 /help 查看命令，/quit 退出\n");

    let mut controller = load_controller(&config)?;
    if let Some(agent) = agent {
        controller.state_mut().active_agent = agent;
    }
    controller.bootstrap().await;
    print_screen(&controller);

    let completer = DefaultCompleter::default();
    let hinter = DefaultHinter::default();
    let prompt = DefaultPrompt::default();

    let mut line_editor = Reedline::create()
        .with_hinter(Box::new(hinter))
        .with_completer(Box::new(completer));

    loop {
        let sig = line_editor.read_line(&prompt)?;

        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();

                if input.starts_with('/') {
                    let parts: Vec<&str> = input.split_whitespace().collect();
                    let cmd = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();

                    match cmd.as_str() {
                        "/quit" | "/exit" => {
                            println!("👋 再见！");
                            break;
                        }
                        "/agents" => match controller.refresh_agents().await {
                            Ok(()) => println!("{}\n", view::render_sidebar(controller.state())),
                            Err(e) => println!("❌ 获取 agent 列表失败：{}\n", e),
                        },
                        "/switch" => {
                            let Some(name) = command_argument(input) else {
                                println!("用法：/switch <名>\n");
                                continue;
                            };
                            if let Err(e) = controller.load_history(name).await {
                                println!("⚠️ 加载历史失败：{}", e);
                            }
                            print_screen(&controller);
                        }
                        "/spawn" => spawn_dialog(&mut controller, &mut line_editor).await?,
                        "/settings" => settings_dialog(&mut controller, &mut line_editor)?,
                        "/sidebar" => {
                            controller.toggle_sidebar();
                            print_screen(&controller);
                        }
                        "/clear" => {
                            line_editor.clear_screen()?;
                            print_screen(&controller);
                        }
                        "/help" | "/h" => print_repl_help(),
                        _ => {
                            println!("❌ 未知命令：{}", input);
                            println!("输入 /help 查看帮助\n");
                        }
                    }
                    continue;
                }

                controller.set_input(buffer.as_str());
                let echo = view::render_input_box(
                    &buffer,
                    term_width().min(60),
                    INPUT_MIN_ROWS,
                    INPUT_MAX_ROWS,
                );

                match controller.send_message().await {
                    SendOutcome::Skipped => continue,
                    SendOutcome::Replied | SendOutcome::Failed(_) => {
                        println!("{}", echo);
                        if let Some(reply) = controller.state().messages.last() {
                            println!("{}\n", view::render_message(reply, term_width()));
                        }
                    }
                }
            }
            Signal::CtrlD => {
                println!("\n👋 再见！");
                break;
            }
            Signal::CtrlC => {
                println!("\n输入 /quit 退出，或继续输入");
            }
        }
    }

    Ok(())
}

/// 主入口函数
pub async fn run_cli() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let command = args.get(1).map(|s| s.to_lowercase()).unwrap_or_else(|| "chat".to_string());

    match command.as_str() {
        "onboard" => return run_onboard(),
        "help" | "-h" | "--help" | "h" => {
            print_help();
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load_default()?;

    match command.as_str() {
        "chat" | "c" => run_chat(config, joined_args(&args[2..])).await,
        "agents" | "a" => run_agents(config).await,
        "history" => {
            let Some(name) = joined_args(&args[2..]) else {
                eprintln!("❌ 请指定 agent 名称");
                eprintln!("用法：fred history <agent>");
                std::process::exit(1);
            };
            run_history(config, &name).await
        }
        "spawn" => run_spawn(config, &args[2..]).await,
        _ => {
            eprintln!("❌ 未知命令：{}", command);
            eprintln!();
            eprintln!("运行 'fred help' 查看帮助信息");
            std::process::exit(1);
        }
    }
}
