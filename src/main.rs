use dotenvy::dotenv;
use slateboard::cli;
use slateboard::logging::init_tracing;
use slateboard::metrics::{init_metrics, metrics_app};
use slateboard::router::init_router;
use slateboard::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "create-admin" {
        handle_create_admin(args).await;
        return;
    }

    if args.len() > 1 && args[1] == "seed" {
        handle_seed(args).await;
        return;
    }

    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    if let Some(handle) = init_metrics() {
        let metrics_port: u16 = std::env::var("METRICS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(9100);
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
                .await
                .expect("Failed to bind metrics listener");
            axum::serve(listener, metrics_app(handle))
                .await
                .expect("Metrics server failed");
        });
        println!("📈 Prometheus metrics on http://localhost:{}/metrics", metrics_port);
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    println!("🚀 Server running on http://localhost:{}", port);
    println!("📚 Swagger UI available at http://localhost:{}/swagger-ui", port);
    println!("📖 Scalar UI available at http://localhost:{}/scalar", port);
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_admin(args: Vec<String>) {
    if args.len() != 7 {
        eprintln!(
            "Usage: {} create-admin <username> <email> <first_name> <last_name> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let username = &args[2];
    let email = &args[3];
    let first_name = &args[4];
    let last_name = &args[5];
    let password = &args[6];

    let pool = connect_for_cli().await;

    match cli::create_admin(&pool, username, email, first_name, last_name, password).await {
        Ok(_) => {
            println!("✅ Admin created successfully!");
            println!("   Username: {}", username);
            println!("   Email: {}", email);
        }
        Err(e) => {
            eprintln!("❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(args: Vec<String>) {
    let num_classes: usize = args
        .get(2)
        .and_then(|v| v.parse().ok())
        .unwrap_or(4);

    let pool = connect_for_cli().await;

    match cli::seeder::seed_database(&pool, num_classes).await {
        Ok(_) => println!("✅ Database seeded successfully!"),
        Err(e) => {
            eprintln!("❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn connect_for_cli() -> sqlx::PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
