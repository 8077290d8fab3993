// src/comanda/mod.rs

// Declara o submódulo com a agregação e validação de comandas
pub mod comanda_structs;
// Declara o submódulo com as rotas de comanda
pub mod comanda_router;
