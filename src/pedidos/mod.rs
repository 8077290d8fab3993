// src/pedidos/mod.rs

// Declara o submódulo que contém as structs de pedidos
pub mod pedidos_structs;
// Declara o submódulo que contém as rotas de pedidos
pub mod pedidos_router;
