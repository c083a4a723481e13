pub mod pumpfun;
