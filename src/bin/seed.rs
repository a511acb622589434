//! Resets the database and loads the sample users and tasks used for local
//! development. Run with `cargo run --bin seed`.

use anyhow::Context;

use task_api::database::tasks::TaskStore;
use task_api::database::users::UserStore;
use task_api::{config, database};

const SAMPLE_PASSWORD: &str = "password123";

struct SampleTask {
    title: &'static str,
    description: &'static str,
    priority: &'static str,
    completed: bool,
    owner: usize,
}

const SAMPLE_USERS: &[(&str, &str)] = &[
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
    ("Mike Johnson", "mike@example.com"),
];

const SAMPLE_TASKS: &[SampleTask] = &[
    SampleTask {
        title: "Complete project documentation",
        description: "Write comprehensive documentation for the API project",
        priority: "high",
        completed: false,
        owner: 0,
    },
    SampleTask {
        title: "Review code changes",
        description: "Review pull requests from team members",
        priority: "medium",
        completed: true,
        owner: 0,
    },
    SampleTask {
        title: "Update dependencies",
        description: "Update all packages to latest versions",
        priority: "low",
        completed: false,
        owner: 0,
    },
    SampleTask {
        title: "Design new user interface",
        description: "Create mockups for the new dashboard design",
        priority: "high",
        completed: false,
        owner: 1,
    },
    SampleTask {
        title: "Test API endpoints",
        description: "Perform comprehensive testing of all API endpoints",
        priority: "medium",
        completed: false,
        owner: 1,
    },
    SampleTask {
        title: "Setup CI/CD pipeline",
        description: "Configure automated testing and deployment",
        priority: "high",
        completed: true,
        owner: 1,
    },
    SampleTask {
        title: "Database optimization",
        description: "Optimize database queries for better performance",
        priority: "medium",
        completed: false,
        owner: 2,
    },
    SampleTask {
        title: "Security audit",
        description: "Perform security audit of the application",
        priority: "high",
        completed: false,
        owner: 2,
    },
    SampleTask {
        title: "Write unit tests",
        description: "Add unit tests for all API endpoints",
        priority: "medium",
        completed: true,
        owner: 2,
    },
    SampleTask {
        title: "Deploy to production",
        description: "Deploy the application to production environment",
        priority: "high",
        completed: false,
        owner: 2,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::config();
    let pool = database::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to connect to database")?;

    database::reset(&pool).await.context("failed to reset schema")?;
    println!("Database reset successfully.");

    let hash = bcrypt::hash(SAMPLE_PASSWORD, config.security.bcrypt_cost)
        .context("failed to hash sample password")?;

    let users = UserStore::new(pool.clone());
    let mut user_ids = Vec::with_capacity(SAMPLE_USERS.len());
    for (name, email) in SAMPLE_USERS {
        let user = users
            .create(name, email, &hash)
            .await
            .with_context(|| format!("failed to create sample user {}", email))?;
        user_ids.push(user.id);
    }

    let tasks = TaskStore::new(pool.clone());
    for task in SAMPLE_TASKS {
        let owned = tasks.owned_by(user_ids[task.owner]);
        let created = owned
            .create(task.title, Some(task.description), task.priority)
            .await
            .with_context(|| format!("failed to create sample task {}", task.title))?;

        if task.completed {
            owned
                .update(created.id, task.title, Some(task.description), true, task.priority)
                .await?;
        }
    }

    println!("Database seeded successfully!");
    println!("Sample users created:");
    for (_, email) in SAMPLE_USERS {
        println!("- {} / {}", email, SAMPLE_PASSWORD);
    }
    println!("Total tasks created: {}", SAMPLE_TASKS.len());

    pool.close().await;
    Ok(())
}
