mod assets;
mod codec;
mod config;
mod gate;
mod mime;
mod obfuscate;
mod range;
