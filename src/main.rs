//! Atelier - terminal workbench with AI integration
//!
//! A line-oriented REPL: free text chats with the active provider, streaming
//! the reply as it arrives; `:`-prefixed commands drive the file workspace,
//! the agents, the evaluator, and provider settings. Type `:help` inside.

use atelier::{
    agents::{run_agent, AgentKind},
    config::{config_path, load_config, sample_config, save_config, user_config_path, AtelierConfig},
    core::Result,
    eval::{EvalOutcome, Evaluator, ExprEvaluator},
    events::{Event, EventBus},
    llm::{ChatMessage, CompletionClient, CompletionRequest, CustomProviderDraft, ProviderRegistry},
    ui::render_markdown_text,
    vfs::{language_for, snapshot_path, FileStore},
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let project_dir = std::env::current_dir()?;
    let config = load_config(&project_dir)
        .map_err(|e| atelier::AtelierError::Config(e.to_string()))?;

    write_sample_config_if_first_run();

    let mut session = Session::new(config);
    session.run()
}

/// Write a commented sample config on first run, best-effort
fn write_sample_config_if_first_run() {
    let Some(path) = user_config_path() else {
        return;
    };
    if path.exists() {
        return;
    }
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_ok() {
            let _ = std::fs::write(&path, sample_config());
        }
    }
}

/// One interactive session
struct Session {
    config: AtelierConfig,
    registry: ProviderRegistry,
    client: CompletionClient,
    files: FileStore,
    files_path: Option<PathBuf>,
    history: Vec<ChatMessage>,
    provider_id: String,
    model: String,
    evaluator: ExprEvaluator,
}

impl Session {
    fn new(config: AtelierConfig) -> Self {
        let registry = ProviderRegistry::with_custom(&config.llm.custom_providers);
        let client =
            CompletionClient::new().with_read_timeout(Duration::from_secs(config.llm.timeout));

        let provider_id = if registry.resolve(&config.llm.default_provider).is_some() {
            config.llm.default_provider.clone()
        } else {
            eprintln!(
                "Unknown default provider '{}', falling back to openrouter",
                config.llm.default_provider
            );
            "openrouter".to_string()
        };
        let model = config
            .llm
            .default_model
            .clone()
            .or_else(|| {
                registry
                    .resolve(&provider_id)
                    .and_then(|p| p.default_model().map(|m| m.to_string()))
            })
            .unwrap_or_default();

        let files_path = snapshot_path();
        let files = files_path
            .as_deref()
            .map(FileStore::load_or_default)
            .unwrap_or_default();

        Self {
            config,
            registry,
            client,
            files,
            files_path,
            history: Vec::new(),
            provider_id,
            model,
            evaluator: ExprEvaluator,
        }
    }

    fn run(&mut self) -> Result<()> {
        println!("atelier - type :help for commands, :quit to leave");
        println!("provider: {} | model: {}", self.provider_id, self.model);

        let stdin = std::io::stdin();
        loop {
            print!("atelier> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = line.strip_prefix(':') {
                if !self.dispatch_command(command) {
                    break;
                }
            } else {
                self.chat(line);
            }
        }
        Ok(())
    }

    /// Handle one `:command`; returns false to exit the loop
    fn dispatch_command(&mut self, command: &str) -> bool {
        let (verb, rest) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };

        match verb {
            "quit" | "exit" | "q" => return false,
            "help" => print_help(),
            "providers" => self.list_providers(),
            "provider" => self.switch_provider(rest),
            "models" => self.list_models(),
            "model" => self.switch_model(rest),
            "addprovider" => self.add_provider(rest),
            "rmprovider" => self.remove_provider(rest),
            "key" => self.set_key(rest),
            "files" => self.list_files(),
            "open" => self.open_file(rest),
            "new" => self.new_file(rest),
            "rm" => self.remove_file(rest),
            "show" => self.show_file(),
            "agent" => self.agent(rest),
            "eval" => self.eval(rest),
            "clear" => {
                self.history.clear();
                println!("chat history cleared");
            }
            _ => println!("unknown command :{} (try :help)", verb),
        }
        true
    }

    /// Send a chat message, streaming the reply to stdout
    fn chat(&mut self, content: &str) {
        let Some(api_key) = self.current_api_key() else {
            return;
        };
        let Some(provider) = self.registry.resolve(&self.provider_id).cloned() else {
            println!("provider '{}' is not registered", self.provider_id);
            return;
        };

        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(content));

        let request = CompletionRequest {
            provider_id: self.provider_id.clone(),
            model: self.model.clone(),
            api_key,
            messages,
        };

        let bus = EventBus::new(256);
        let cancel = atelier::llm::CancelToken::new();
        let handle = self
            .client
            .spawn(provider, request, bus.sender(), cancel);

        let outcome = loop {
            match bus.recv_timeout(Duration::from_millis(100)) {
                Some(Event::LlmChunk(delta)) => {
                    print!("{}", delta);
                    let _ = std::io::stdout().flush();
                }
                Some(Event::LlmDone(full)) => break Ok(full),
                Some(Event::LlmError(message)) => break Err(message),
                Some(Event::Tick) | None => {}
            }
        };
        let _ = handle.join();
        println!();

        match outcome {
            Ok(full) => {
                self.history.push(ChatMessage::user(content));
                self.history.push(ChatMessage::assistant(full));
            }
            Err(message) => {
                // The in-progress reply is discarded; the transcript keeps
                // only completed exchanges
                println!("error: {}", message);
            }
        }
    }

    /// API key for the active provider, complaining when one is required
    fn current_api_key(&self) -> Option<String> {
        let provider = self.registry.resolve(&self.provider_id)?;
        let key = self.config.api_key_for(&self.provider_id).unwrap_or("");
        if provider.requires_api_key && key.is_empty() {
            println!(
                "{} requires an API key; set one with :key {} <key>",
                provider.name, provider.id
            );
            return None;
        }
        Some(key.to_string())
    }

    fn list_providers(&self) {
        for provider in self.registry.all() {
            let marker = if provider.id == self.provider_id { "●" } else { " " };
            let key = if self.config.api_key_for(&provider.id).is_some() || !provider.requires_api_key {
                "key set"
            } else {
                "no key"
            };
            println!("{} {:<14} {:<12} [{}]", marker, provider.id, provider.name, key);
        }
    }

    fn switch_provider(&mut self, id: &str) {
        let Some(provider) = self.registry.resolve(id) else {
            println!("unknown provider '{}'", id);
            return;
        };
        self.provider_id = provider.id.clone();
        self.model = provider.default_model().unwrap_or_default().to_string();
        println!("provider: {} | model: {}", self.provider_id, self.model);
    }

    fn list_models(&self) {
        for model in self.registry.list_models(&self.provider_id) {
            let marker = if model.value == self.model { "●" } else { " " };
            println!("{} {:<40} {}", marker, model.value, model.label);
        }
    }

    fn switch_model(&mut self, value: &str) {
        if value.is_empty() {
            println!("usage: :model <identifier>");
            return;
        }
        self.model = value.to_string();
        println!("model: {}", self.model);
    }

    fn add_provider(&mut self, rest: &str) {
        let parts: Vec<&str> = rest.splitn(4, char::is_whitespace).collect();
        if parts.len() < 4 {
            println!("usage: :addprovider <id> <name> <base_url> <models,comma,separated>");
            return;
        }
        let draft = CustomProviderDraft {
            id: parts[0].to_string(),
            name: parts[1].to_string(),
            base_url: parts[2].to_string(),
            models: parts[3].to_string(),
        };
        match self.registry.register_custom(draft.clone()) {
            Ok(provider) => {
                self.config.llm.custom_providers.push(draft);
                self.persist_config();
                println!("registered custom provider '{}'", provider.id);
            }
            Err(e) => println!("invalid provider: {}", e),
        }
    }

    fn remove_provider(&mut self, id: &str) {
        self.registry.unregister_custom(id);
        self.config.llm.custom_providers.retain(|p| p.id != id);
        self.persist_config();
        println!("removed custom provider '{}' (if it existed)", id);
    }

    fn set_key(&mut self, rest: &str) {
        let Some((provider_id, key)) = rest.split_once(char::is_whitespace) else {
            println!("usage: :key <provider> <api-key>");
            return;
        };
        self.config.set_api_key(provider_id.trim(), key.trim());
        self.persist_config();
        println!("stored API key for {}", provider_id.trim());
    }

    fn list_files(&self) {
        for name in self.files.names() {
            let marker = if name == self.files.current() { "●" } else { " " };
            println!("{} {:<24} [{}]", marker, name, language_for(name));
        }
    }

    fn open_file(&mut self, name: &str) {
        match self.files.set_current(name) {
            Ok(()) => self.show_file(),
            Err(e) => println!("{}", e),
        }
    }

    fn new_file(&mut self, name: &str) {
        if name.is_empty() {
            println!("usage: :new <filename>");
            return;
        }
        match self.files.create(name) {
            Ok(()) => {
                self.persist_files();
                println!("created {}", name);
            }
            Err(e) => println!("{}", e),
        }
    }

    fn remove_file(&mut self, name: &str) {
        match self.files.delete(name) {
            Ok(()) => {
                self.persist_files();
                println!("deleted {}", name);
            }
            Err(e) => println!("{}", e),
        }
    }

    fn show_file(&self) {
        let name = self.files.current();
        println!("── {} [{}] ──", name, language_for(name));
        println!("{}", self.files.current_content());
    }

    fn agent(&mut self, kind: &str) {
        let Some(kind) = AgentKind::parse(kind) else {
            println!("usage: :agent explain|refactor|tests|plan");
            return;
        };
        let Some(api_key) = self.current_api_key() else {
            return;
        };

        println!("running {} agent on {}...", kind.name(), self.files.current());
        let outcome = run_agent(
            kind,
            self.files.current_content(),
            &self.client,
            &self.registry,
            &self.provider_id,
            &self.model,
            &api_key,
        );
        match outcome {
            Ok(report) => println!("{}", render_markdown_text(&report)),
            Err(e) => println!("agent failed: {}", e),
        }
    }

    fn eval(&self, expr: &str) {
        match self.evaluator.eval(expr) {
            EvalOutcome::Value(value) => println!("= {}", value),
            EvalOutcome::Error(message) => println!("eval error: {}", message),
        }
    }

    fn persist_config(&self) {
        match config_path() {
            Ok(path) => {
                if let Err(e) = save_config(&self.config, &path) {
                    eprintln!("failed to save config: {}", e);
                }
            }
            Err(e) => eprintln!("failed to save config: {}", e),
        }
    }

    fn persist_files(&self) {
        if let Some(path) = &self.files_path {
            if let Err(e) = self.files.save(path) {
                eprintln!("failed to save files: {}", e);
            }
        }
    }
}

fn print_help() {
    println!(
        "\
chat            type any text to chat with the active provider
:providers      list providers        :provider <id>   switch provider
:models         list models           :model <id>      switch model
:key <p> <k>    store an API key
:addprovider <id> <name> <url> <models>   register a custom provider
:rmprovider <id>                          remove a custom provider
:files          list files            :open <f>        open a file
:new <f>        create a file         :rm <f>          delete a file
:show           print the active file
:agent <kind>   explain|refactor|tests|plan on the active file
:eval <expr>    evaluate an arithmetic expression
:clear          clear chat history    :quit            exit"
    );
}
