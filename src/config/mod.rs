//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de variables de entorno
//! del sistema.

pub mod environment;

pub use environment::*;
