//! End-to-end tests: a live server task and a client talking over an in-memory pipe

use std::io::Write;

use frappe_completion::{
    CompletionEngine, CompletionTrigger, ConfigLoader, Domain, EngineConfig,
    FrappeCompletionEngine,
};
use frappe_lsp::{LspMessage, LspServer, MessageTransport};
use serde_json::{json, Value};
use tokio::io::{duplex, split, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

type ClientTransport = MessageTransport<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>>;

struct Session {
    client: ClientTransport,
    server: JoinHandle<LspServer>,
    next_id: i64,
}

impl Session {
    async fn start(config: EngineConfig) -> Self {
        let (client_end, server_end) = duplex(64 * 1024);

        let server = tokio::spawn(async move {
            let (read, write) = split(server_end);
            let mut transport = MessageTransport::new(BufReader::new(read), write);
            let mut server = LspServer::new(config);
            server.run(&mut transport).await.unwrap();
            server
        });

        let (read, write) = split(client_end);
        let mut session = Self {
            client: MessageTransport::new(BufReader::new(read), write),
            server,
            next_id: 1,
        };

        session
            .request(
                "initialize",
                json!({"capabilities": {"textDocument": {"completion": {"completionItem": {"snippetSupport": true}}}}}),
            )
            .await;
        session.notify("initialized", json!({})).await;
        session
    }

    async fn notify(&mut self, method: &str, params: Value) {
        let message = LspMessage::Notification(frappe_lsp::JsonRpcNotification::new(method, Some(params)));
        self.client.write_message(&message).await.unwrap();
    }

    /// Send a request and wait for its response, skipping server-initiated messages
    async fn request(&mut self, method: &str, params: Value) -> frappe_lsp::JsonRpcResponse {
        let id = self.next_id;
        self.next_id += 1;
        let message = LspMessage::Request(frappe_lsp::JsonRpcRequest::new(json!(id), method, Some(params)));
        self.client.write_message(&message).await.unwrap();

        loop {
            match self.client.read_message().await.unwrap() {
                Some(LspMessage::Response(resp)) if resp.id == json!(id) => return resp,
                Some(_) => continue,
                None => panic!("server closed the connection"),
            }
        }
    }

    async fn open(&mut self, uri: &str, text: &str) {
        self.notify(
            "textDocument/didOpen",
            json!({"textDocument": {"uri": uri, "languageId": "javascript", "version": 1, "text": text}}),
        )
        .await;
    }

    async fn complete(&mut self, uri: &str, line: u32, character: u32, trigger: Option<char>) -> Vec<Value> {
        let context = match trigger {
            Some(ch) => json!({"triggerKind": 2, "triggerCharacter": ch.to_string()}),
            None => json!({"triggerKind": 1}),
        };
        let response = self
            .request(
                "textDocument/completion",
                json!({
                    "textDocument": {"uri": uri},
                    "position": {"line": line, "character": character},
                    "context": context,
                }),
            )
            .await;
        response.result.unwrap()["items"].as_array().unwrap().clone()
    }

    async fn finish(mut self) -> LspServer {
        self.request("shutdown", json!(null)).await;
        self.notify("exit", json!(null)).await;
        self.server.await.unwrap()
    }
}

fn labels(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| item["label"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_server_items_match_engine_for_every_suffix_domain() {
    let engine = FrappeCompletionEngine::builtin();
    let mut session = Session::start(EngineConfig::default()).await;

    let cases = [
        (Domain::RootNamespace, "frappe."),
        (Domain::Session, "frappe.session."),
        (Domain::Database, "frappe.db."),
        (Domain::UiNamespace, "frappe.ui."),
        (Domain::AttachHandler, "frappe.ui.form."),
        (Domain::FormInstance, "frm."),
    ];

    for (index, (domain, prefix)) in cases.iter().enumerate() {
        let uri = format!("file:///project/script_{}.js", index);
        let text = format!("// {}\n{}", domain, prefix);
        session.open(&uri, &text).await;

        let items = session
            .complete(&uri, 1, prefix.chars().count() as u32, Some('.'))
            .await;
        let expected: Vec<String> = engine
            .complete(&text, text.len(), CompletionTrigger::Character('.'))
            .into_iter()
            .map(|item| item.label)
            .collect();

        assert!(!items.is_empty());
        assert_eq!(labels(&items), expected, "mismatch for {}", domain);
    }

    let server = session.finish().await;
    assert!(server.exited_cleanly());
}

#[tokio::test]
async fn test_typical_client_script_editing_flow() {
    let mut session = Session::start(EngineConfig::default()).await;
    let uri = "file:///app/public/js/sales_order.js";

    session.open(uri, "f").await;
    let items = session.complete(uri, 0, 1, Some('f')).await;
    assert_eq!(labels(&items)[0], "frappe");

    session
        .notify(
            "textDocument/didChange",
            json!({
                "textDocument": {"uri": uri, "version": 2},
                "contentChanges": [{"text": "frappe.ui.form."}]
            }),
        )
        .await;
    let items = session.complete(uri, 0, 15, Some('.')).await;
    assert_eq!(labels(&items), vec!["on"]);
    assert!(items[0]["insertText"].as_str().unwrap().contains("${2:refresh}(frm)"));

    let handler_map = "frappe.ui.form.on(\"Sales Order\", {\n\t\n});";
    session
        .notify(
            "textDocument/didChange",
            json!({
                "textDocument": {"uri": uri, "version": 3},
                "contentChanges": [{"text": handler_map}]
            }),
        )
        .await;
    let items = session.complete(uri, 1, 1, None).await;
    assert_eq!(items.len(), 23);
    assert_eq!(items[3]["label"], json!("refresh"));
    assert_eq!(items[3]["insertText"], json!("refresh(frm){\n\t$0\n},"));

    session.finish().await;
}

#[tokio::test]
async fn test_doc_link_configuration_reaches_items() {
    let config = EngineConfig {
        append_doc_link: true,
        show_welcome_message: false,
        ..EngineConfig::default()
    };
    let mut session = Session::start(config).await;
    session.open("file:///a.js", "frappe.session.").await;

    let items = session.complete("file:///a.js", 0, 15, Some('.')).await;
    let documentation = items[0]["documentation"]["value"].as_str().unwrap();
    assert!(documentation.starts_with("Current user ID\n\n[Frappe Framework documentation]("));

    session.finish().await;
}

#[tokio::test]
async fn test_config_file_drives_rendering() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "show_welcome_message: false").unwrap();
    writeln!(file, "snippet_support: false").unwrap();

    let config = ConfigLoader::load_or_default(Some(file.path())).unwrap();
    let mut session = Session::start(config).await;
    session.open("file:///b.js", "frappe.db.").await;

    let items = session.complete("file:///b.js", 0, 10, Some('.')).await;
    let exists = items
        .iter()
        .find(|item| item["label"] == json!("exists"))
        .unwrap();
    assert_eq!(exists["insertTextFormat"], json!(1));
    assert_eq!(exists["insertText"], json!("exists(\"doctype\", \"name\")"));

    let server = session.finish().await;
    assert!(server.exited_cleanly());
}
