use std::net::SocketAddr;

use dotenvy::dotenv;

use brotes_api::cli;
use brotes_api::logging::init_tracing;
use brotes_api::router::init_router;
use brotes_api::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "create-admin" {
        handle_create_admin(args).await;
        return;
    }
    if args.len() > 1 && args[1] == "repair-profiles" {
        handle_repair_profiles().await;
        return;
    }

    init_tracing();

    let state = match init_app_state() {
        Ok(state) => state,
        Err(err) => {
            eprintln!("❌ Error inicializando servicios: {err}");
            std::process::exit(1);
        }
    };
    let app = init_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server port");
    println!("🚀 Servidor corriendo en puerto {port}");
    println!("📚 Swagger UI disponible en http://localhost:{port}/swagger-ui");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

async fn handle_create_admin(args: Vec<String>) {
    if args.len() != 4 {
        eprintln!("Usage: {} create-admin <email> <password>", args[0]);
        std::process::exit(1);
    }

    let email = &args[2];
    let password = &args[3];

    let state = match init_app_state() {
        Ok(state) => state,
        Err(err) => {
            eprintln!("❌ Error inicializando servicios: {err}");
            std::process::exit(1);
        }
    };

    match cli::create_admin(&state, email, password).await {
        Ok(uid) => {
            println!("✅ Admin creado");
            println!("   Email: {email}");
            println!("   Uid: {uid}");
        }
        Err(err) => {
            eprintln!("❌ Error creando admin: {err}");
            std::process::exit(1);
        }
    }
}

async fn handle_repair_profiles() {
    let state = match init_app_state() {
        Ok(state) => state,
        Err(err) => {
            eprintln!("❌ Error inicializando servicios: {err}");
            std::process::exit(1);
        }
    };

    match cli::repair_profiles(&state).await {
        Ok(0) => println!("✅ Sin perfiles faltantes"),
        Ok(repaired) => println!("✅ Perfiles recreados: {repaired}"),
        Err(err) => {
            eprintln!("❌ Error reparando perfiles: {err}");
            std::process::exit(1);
        }
    }
}
