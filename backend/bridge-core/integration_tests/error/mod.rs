mod codec;
mod resource;
