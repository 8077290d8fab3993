// src/cardapio/mod.rs

// Declara o submódulo que contém as structs do cardápio
pub mod cardapio_structs;
// Declara o submódulo que contém as rotas do cardápio
pub mod cardapio_router;
