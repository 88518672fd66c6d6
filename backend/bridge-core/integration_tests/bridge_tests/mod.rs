mod assets;
mod helpers;
mod rpc;
