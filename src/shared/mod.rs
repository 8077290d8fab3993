// src/shared/mod.rs

// Declara o submódulo com o envelope de resposta da API
pub mod shared_structs;
// Declara o submódulo com o tipo de erro da API
pub mod erros;
