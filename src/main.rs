// src/main.rs

use actix_web::{get, middleware, web, App, HttpResponse, HttpServer};
use sqlx::{Pool, Postgres};
use std::sync::RwLock;
use tracing_subscriber::EnvFilter;

// Importa os módulos
//
// Cada módulo de domínio tem seu `<nome>_structs.rs` (modelos e payloads)
// e seu `<nome>_router.rs` (rotas). O Rust encontra o `mod.rs` de cada
// pasta e, a partir dele, os submódulos.
mod cardapio;  // Módulo do cardápio (menu)
mod carrinho;  // Módulo da sacola de compras
mod clientes;  // Módulo de clientes e identificação por telefone
mod comanda;   // Módulo de comandas (contas de mesa)
mod pedidos;   // Módulo de pedidos
mod shared;    // Módulo shared (envelope de resposta e erros)

use crate::shared::shared_structs::RespostaApi;

// Estado compartilhado com a conexão do banco de dados.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
}

/// Verificação simples de saúde da API.
#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(RespostaApi::mensagem("API is running"))
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Carrega o .env (se existir) e inicializa o logging estruturado.
    // RUST_LOG controla o nível; os logs do middleware HTTP do actix
    // chegam aqui pela ponte log -> tracing.
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // URL de conexão com o banco de dados PostgreSQL.
    // O tipo das colunas de preço precisa ser NUMERIC/DECIMAL para
    // compatibilidade com bigdecimal::BigDecimal (ver schema.sql).
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL não definida no ambiente");

    // Conecta ao banco usando um pool de conexões.
    let db_pool = Pool::<Postgres>::connect(&database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // Estado compartilhado da aplicação.
    // web::Data é usado para compartilhar dados entre as rotas.
    let app_state = web::Data::new(AppState { db_pool });

    // Cria e compartilha a sacola de compras em memória.
    // RwLock permite múltiplos leitores ou um único escritor.
    let carrinho_state = web::Data::new(RwLock::new(
        carrinho::carrinho_structs::Carrinho::default(),
    ));

    tracing::info!("Iniciando API Casa do Norte em {}...", bind_addr);

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            // Adiciona o estado compartilhado à aplicação.
            // .clone() é necessário porque a closure é movida
            // e pode ser executada várias vezes.
            .app_data(app_state.clone())
            .app_data(carrinho_state.clone())
            .wrap(middleware::Logger::default())
            // Verificação de saúde fora do prefixo /api
            .service(health)
            .service(
                web::scope("/api")
                    // Módulo do Cardápio
                    // (as rotas fixas vêm antes das rotas com {id})
                    .service(cardapio::cardapio_router::buscar_categorias)
                    .service(cardapio::cardapio_router::buscar_cardapio_admin)
                    .service(cardapio::cardapio_router::buscar_cardapio)
                    .service(cardapio::cardapio_router::cadastrar_item)
                    .service(cardapio::cardapio_router::atualizar_item)
                    .service(cardapio::cardapio_router::remover_item)
                    // Módulo de Pedidos
                    .service(pedidos::pedidos_router::estatisticas_de_pedidos)
                    .service(pedidos::pedidos_router::buscar_pedidos)
                    .service(pedidos::pedidos_router::criar_pedido)
                    .service(pedidos::pedidos_router::buscar_pedido_por_id)
                    .service(pedidos::pedidos_router::atualizar_status)
                    .service(pedidos::pedidos_router::registrar_pagamento)
                    .service(pedidos::pedidos_router::atualizar_pedido)
                    // Módulo de Comandas
                    .service(comanda::comanda_router::buscar_comanda)
                    .service(comanda::comanda_router::fechar_comanda)
                    // Módulo da Sacola
                    .service(carrinho::carrinho_router::adicionar_item_sacola)
                    .service(carrinho::carrinho_router::definir_quantidade_sacola)
                    .service(carrinho::carrinho_router::remover_item_sacola)
                    .service(carrinho::carrinho_router::finalizar_sacola)
                    .service(carrinho::carrinho_router::limpar_sacola)
                    .service(carrinho::carrinho_router::ver_sacola)
                    // Módulo de Clientes
                    .service(clientes::clientes_router::autenticar_por_telefone)
                    .service(clientes::clientes_router::estatisticas_de_clientes)
                    .service(clientes::clientes_router::buscar_clientes)
                    .service(clientes::clientes_router::buscar_pedidos_do_cliente)
                    .service(clientes::clientes_router::buscar_cliente_por_id)
                    .service(clientes::clientes_router::atualizar_cliente)
                    .service(clientes::clientes_router::remover_cliente),
            )
    })
    // Vincula o servidor ao endereço e porta. O '?' propaga erros.
    .bind(&bind_addr)?
    // Inicia o servidor.
    .run()
    // Aguarda a finalização do servidor.
    .await
}
