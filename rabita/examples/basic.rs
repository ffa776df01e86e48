//! Basic example of the Rabita container.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use rabita::prelude::*;

// === Define your services ===

struct Logger {
    prefix: String,
}

impl Logger {
    fn log(&self, msg: &str) {
        println!("{} {msg}", self.prefix);
    }
}

impl Service for Logger {}

struct Database {
    url: String,
    logger: Arc<Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("executing: {sql}"));
        format!("results from {}", self.url)
    }
}

impl Service for Database {
    // Expose the connection URL to dotted aliases like
    // "container.database.url".
    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "url" => Some(Value::from(self.url.as_str())),
            _ => None,
        }
    }
}

struct UserRepository {
    db: Arc<Database>,
    owner: OnceCell<Container>,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        // The container was bound right after construction; use it to
        // resolve the logger lazily instead of wiring it up front.
        if let Some(logger) = self
            .owner
            .get()
            .and_then(|owner| owner.get("logger").ok())
            .and_then(|value| value.downcast::<Logger>())
        {
            logger.log(&format!("looking up user {id}"));
        }
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

impl Service for UserRepository {
    fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
        Some(self)
    }
}

impl ContainerAware for UserRepository {
    fn set_container(&self, container: Container) {
        let _ = self.owner.set(container);
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("rabita=debug")
        .init();

    let container = Container::new();

    // Primitive configuration values
    container.add_string("log_prefix", "[app]")?;
    container.add_string("database_url", "postgres://localhost/app")?;

    // Logger — built from a primitive entry
    container.add_object(
        "logger",
        |args| {
            let prefix = args[0].as_str().ok_or("log_prefix must be a string")?.to_owned();
            Ok(Arc::new(Logger { prefix }))
        },
        ObjectConfig::new().with_args(vec!["container.log_prefix".into()]),
    )?;

    // Database — depends on a primitive and on the logger, announces
    // readiness through the post-construct callback
    container.add_object(
        "database",
        |args| {
            let url = args[0].as_str().ok_or("database_url must be a string")?.to_owned();
            let logger = args[1].downcast::<Logger>().ok_or("logger dependency missing")?;
            Ok(Arc::new(Database { url, logger }))
        },
        ObjectConfig::new()
            .with_args(vec![
                "container.database_url".into(),
                "container.logger".into(),
            ])
            .callback(|_, _| println!("database ready")),
    )?;

    // UserRepository — autoloaded at registration, receives the
    // container through the container-aware capability
    container.add_object(
        "user_repository",
        |args| {
            let db = args[0].downcast::<Database>().ok_or("database dependency missing")?;
            Ok(Arc::new(UserRepository {
                db,
                owner: OnceCell::new(),
            }))
        },
        ObjectConfig::new()
            .with_args(vec!["container.database".into()])
            .autoload(true),
    )?;

    println!("{container:?}");

    let repo = container
        .get("user_repository")?
        .downcast::<UserRepository>()
        .expect("user_repository should be a UserRepository");
    println!("{}", repo.find_user(42));

    // Dotted aliases reach into a resolved object's fields
    let url = container.get("container.database.url")?;
    println!("database url via alias: {}", url.as_str().unwrap_or("<unset>"));

    Ok(())
}
