// src/carrinho/mod.rs

// Declara o submódulo com a sacola de compras (o motor do carrinho)
pub mod carrinho_structs;
// Declara o submódulo com as rotas da sacola
pub mod carrinho_router;
