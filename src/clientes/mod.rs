// src/clientes/mod.rs

// Declara o submódulo que contém as structs de clientes
pub mod clientes_structs;
// Declara o submódulo que contém as rotas de clientes
pub mod clientes_router;
// Declara o submódulo com a máscara de telefone brasileiro
pub mod telefone;
