// ============================================================================
// Overlay Demo Binary
// ============================================================================
//
// Seeds the in-memory backend, signs a user in, mounts a workbench for the
// chosen entity, and runs a scripted optimistic session: create, update,
// delete. The overlay list prints as pretty JSON after every step so the
// placeholder sentinels are visible while a mutation is in flight, and the
// notification log prints at the end. `--fail <step>` arms one injected
// gateway failure; `--latency-ms` slows every gateway call down.
// ============================================================================

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

use rustoverlay::backend::{EntityBackend, InMemoryBackend, InMemoryGateway};
use rustoverlay::core::ReconcilePolicy;
use rustoverlay::entity::catalog::{
    CommentParams, PostParams, SubscriptionParams, TopicParams, VoteParams,
};
use rustoverlay::entity::{EntityDescriptor, EntityRecord};
use rustoverlay::surface::{NoticeKind, RecordingModal, RecordingNavigator, RecordingNotifier};
use rustoverlay::workbench::ViewWorkbench;

#[derive(Parser)]
#[command(name = "rustoverlay")]
#[command(about = "Scripted optimistic mutation session against the in-memory backend")]
struct Cli {
    /// Entity the session runs against
    #[arg(long, value_enum, default_value = "topic")]
    entity: Entity,
    /// Inject one gateway failure at the given step
    #[arg(long, value_enum)]
    fail: Option<Step>,
    /// Artificial latency per gateway call, in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Entity {
    Topic,
    Post,
    Comment,
    Vote,
    Subscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Step {
    Create,
    Update,
    Delete,
}

impl Step {
    fn label(self) -> &'static str {
        match self {
            Step::Create => "create",
            Step::Update => "update",
            Step::Delete => "delete",
        }
    }
}

/// One mounted workbench plus the recorded surfaces behind it.
struct Demo<D: EntityDescriptor> {
    workbench: ViewWorkbench<D>,
    gateway: Arc<InMemoryGateway<D>>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    fail: Option<Step>,
}

impl<D: EntityDescriptor> Demo<D> {
    async fn mount(stack: EntityBackend<D>, cli: &Cli) -> Result<Self> {
        if cli.latency_ms > 0 {
            stack
                .gateway
                .set_latency(Duration::from_millis(cli.latency_ms));
        }
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let workbench = ViewWorkbench::<D>::mount(
            stack.source.clone(),
            stack.gateway.clone(),
            Arc::new(RecordingModal::<D::Record>::new()),
            notifier.clone(),
            navigator.clone(),
            ReconcilePolicy::default(),
        )
        .await?;
        Ok(Demo {
            workbench,
            gateway: stack.gateway,
            notifier,
            navigator,
            fail: cli.fail,
        })
    }

    /// Arms the injected failure when the session reaches the chosen step.
    fn arm(&self, step: Step) {
        if self.fail == Some(step) {
            println!("(arming one {} failure)", step.label());
            self.gateway
                .fail_next(format!("injected {} failure", step.label()));
        }
    }

    async fn show(&self, label: &str) -> Result<()> {
        let list = self.workbench.list().await;
        let rows: Vec<&D::Record> = list.iter().collect();
        println!("\n== {} ==", label);
        println!("{}", serde_json::to_string_pretty(&rows)?);
        let pending = self.workbench.pending_count().await;
        if pending > 0 {
            println!("({} pending row(s) in flight)", pending);
        }
        Ok(())
    }

    /// The newest persisted row, the target for the next update or delete.
    async fn latest_persisted(&self) -> Option<D::Record> {
        self.workbench
            .list()
            .await
            .iter()
            .rev()
            .find(|record| record.id().is_persisted())
            .cloned()
    }

    async fn finish(self) -> Result<()> {
        self.workbench.refresh().await?;
        self.show("authoritative after refresh").await?;

        println!("\n== notifications ==");
        for notice in self.notifier.notices() {
            let mark = match notice.kind {
                NoticeKind::Success => "ok ",
                NoticeKind::Failure => "err",
            };
            match notice.detail {
                Some(detail) => println!("[{}] {}: {}", mark, notice.message, detail),
                None => println!("[{}] {}", mark, notice.message),
            }
        }
        let paths = self.navigator.paths();
        if !paths.is_empty() {
            println!("navigated to: {}", paths.join(", "));
        }
        Ok(())
    }
}

/// Create, update, delete, then a final refresh back to authoritative truth.
/// A failed step ends the session at the next missing target; the refresh
/// still runs so the output shows the overlay converging.
async fn run_session<D: EntityDescriptor>(
    demo: Demo<D>,
    create: D::Params,
    revise: D::Params,
) -> Result<()> {
    demo.show("mounted").await?;

    demo.arm(Step::Create);
    demo.workbench.submit(create, None).await?;
    demo.show("after create").await?;

    let Some(target) = demo.latest_persisted().await else {
        return demo.finish().await;
    };
    demo.arm(Step::Update);
    demo.workbench.submit(revise, Some(target)).await?;
    demo.show("after update").await?;

    let Some(target) = demo.latest_persisted().await else {
        return demo.finish().await;
    };
    demo.arm(Step::Delete);
    demo.workbench.request_delete(target).await?;
    demo.show("after delete").await?;

    demo.finish().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let backend = InMemoryBackend::new();
    let session = backend
        .sign_up("alice@example.com", Some("Alice"), "password123")
        .await?;
    let me = session.user.id.clone();
    println!("signed in as {}", session.user.email);

    let rust = backend.seed_topic("Rust", "rust", Some(&me)).await;
    let go = backend.seed_topic("Go", "go", Some(&me)).await;
    let hello = backend
        .seed_post("Hello Rust", "hello-rust", "First post.", &rust.id, &me)
        .await;

    match cli.entity {
        Entity::Topic => {
            let demo = Demo::mount(backend.topic_stack(), &cli).await?;
            run_session(
                demo,
                TopicParams {
                    name: "Zig".into(),
                    slug: "zig".into(),
                },
                TopicParams {
                    name: "Zig (revised)".into(),
                    slug: "zig".into(),
                },
            )
            .await
        }
        Entity::Post => {
            let demo = Demo::mount(backend.post_stack(), &cli).await?;
            run_session(
                demo,
                PostParams {
                    title: "Borrow checker notes".into(),
                    slug: "borrow-checker-notes".into(),
                    content: "Draft.".into(),
                    topic_id: rust.id.clone(),
                },
                PostParams {
                    title: "Borrow checker notes".into(),
                    slug: "borrow-checker-notes".into(),
                    content: "Expanded the aliasing section.".into(),
                    topic_id: go.id.clone(),
                },
            )
            .await
        }
        Entity::Comment => {
            let demo = Demo::mount(backend.comment_stack(), &cli).await?;
            run_session(
                demo,
                CommentParams {
                    text: "Nice writeup!".into(),
                    post_id: hello.id.clone(),
                },
                CommentParams {
                    text: "Nice writeup! (edited)".into(),
                    post_id: hello.id.clone(),
                },
            )
            .await
        }
        Entity::Vote => {
            let demo = Demo::mount(backend.vote_stack(), &cli).await?;
            run_session(
                demo,
                VoteParams {
                    up: true,
                    post_id: hello.id.clone(),
                },
                VoteParams {
                    up: false,
                    post_id: hello.id.clone(),
                },
            )
            .await
        }
        Entity::Subscription => {
            let demo = Demo::mount(backend.subscription_stack(), &cli).await?;
            run_session(
                demo,
                SubscriptionParams {
                    name: Some("rust weekly".into()),
                    topic_id: rust.id.clone(),
                },
                SubscriptionParams {
                    name: Some("rust monthly".into()),
                    topic_id: rust.id.clone(),
                },
            )
            .await
        }
    }
}
